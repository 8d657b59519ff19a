use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;
use workflow_bridge::{WeatherOutcome, WeatherReport, WorkflowClient};

/// Source of current weather for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, location: &str) -> Result<WeatherReport>;
}

/// Weather backed by the external workflow engine.
pub struct WorkflowWeather {
    client: WorkflowClient,
}

impl WorkflowWeather {
    pub fn new(client: WorkflowClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WeatherProvider for WorkflowWeather {
    async fn current_weather(&self, location: &str) -> Result<WeatherReport> {
        let outcome = workflow_bridge::current_weather(&self.client, location).await?;
        if let WeatherOutcome::FellBack { reason, .. } = &outcome {
            warn!(location, %reason, "weather report fell back to default values");
        }
        Ok(outcome.into_report())
    }
}
