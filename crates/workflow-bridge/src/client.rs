use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, WorkflowError};

/// How long to wait before the single `/result` follow-up once the engine
/// acknowledges a trigger with "Workflow was started".
pub const DEFAULT_STARTED_POLL_DELAY: Duration = Duration::from_millis(3000);

const DEFAULT_BASE_URL: &str = "http://localhost:5678";

/// Builder for [`WorkflowClient`].
#[derive(Default)]
pub struct WorkflowClientBuilder {
    base: Option<Url>,
    api_key: Option<String>,
    client: Option<Client>,
    started_poll_delay: Option<Duration>,
}

impl WorkflowClientBuilder {
    /// Set the engine base URL (the webhook endpoint itself).
    pub fn base_url(mut self, url: Url) -> Self {
        self.base = Some(url);
        self
    }

    /// Bearer token sent with every request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Provide a custom reqwest client instance.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Override the wait before the `/result` follow-up.
    pub fn started_poll_delay(mut self, delay: Duration) -> Self {
        self.started_poll_delay = Some(delay);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<WorkflowClient> {
        let base = self
            .base
            .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("default workflow engine URL"));
        let client = self.client.unwrap_or_else(Client::new);

        Ok(WorkflowClient {
            base,
            api_key: self.api_key,
            client,
            started_poll_delay: self.started_poll_delay.unwrap_or(DEFAULT_STARTED_POLL_DELAY),
        })
    }
}

/// HTTP client for the external workflow engine.
#[derive(Clone, Debug)]
pub struct WorkflowClient {
    base: Url,
    api_key: Option<String>,
    client: Client,
    started_poll_delay: Duration,
}

impl WorkflowClient {
    /// Create a new builder.
    pub fn builder() -> WorkflowClientBuilder {
        WorkflowClientBuilder::default()
    }

    pub fn started_poll_delay(&self) -> Duration {
        self.started_poll_delay
    }

    // The engine addresses sub-endpoints relative to the full webhook URL,
    // so extend the base by string rather than `Url::join` (which would
    // replace the final path segment).
    fn sub_endpoint(&self, suffix: &str) -> String {
        format!("{}/{}", self.base.as_str().trim_end_matches('/'), suffix)
    }

    async fn post(&self, url: String, body: &Value) -> Result<Value> {
        let mut request = self.client.post(url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Trigger a named tool workflow: `POST {base}` with
    /// `{tool, location, timestamp}`.
    pub async fn trigger_tool(&self, tool: &str, location: &str) -> Result<Value> {
        let body = json!({
            "tool": tool,
            "location": location,
            "timestamp": Utc::now().to_rfc3339(),
        });
        debug!(tool, location, "triggering workflow webhook");
        self.post(self.base.to_string(), &body).await
    }

    /// One follow-up poll for an asynchronously started workflow:
    /// `POST {base}/result` with `{tool, location}`.
    pub async fn fetch_result(&self, tool: &str, location: &str) -> Result<Value> {
        let body = json!({ "tool": tool, "location": location });
        self.post(self.sub_endpoint("result"), &body).await
    }

    /// Execute a named workflow through the engine's REST surface and return
    /// its `data` field.
    pub async fn execute_workflow(&self, workflow_id: &str, params: Value) -> Result<Value> {
        let url = self.sub_endpoint(&format!("api/v1/workflows/{workflow_id}/execute"));
        debug!(workflow_id, "executing workflow");
        let mut reply = self.post(url, &params).await?;
        reply
            .as_object_mut()
            .and_then(|map| map.remove("data"))
            .ok_or_else(|| WorkflowError::MissingData(workflow_id.to_string()))
    }

    /// Fetch a workflow's definition and status.
    pub async fn workflow_details(&self, workflow_id: &str) -> Result<Value> {
        let url = self.sub_endpoint(&format!("api/v1/workflows/{workflow_id}"));
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}
