use std::fmt;

use serde_json::Map;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::classify::{classify, WorkflowReply};
use crate::client::WorkflowClient;
use crate::error::Result;
use crate::normalize::{normalize_weather, WeatherReport};

/// Tool name sent with weather triggers.
pub const WEATHER_TOOL_ID: &str = "weather";

/// Why a weather call ended up on fallback values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The engine started the workflow but the `/result` follow-up failed.
    ResultUnavailable(String),
    /// The reply carried no recognizable result fields.
    EmptyReply,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResultUnavailable(err) => write!(f, "result endpoint unavailable: {err}"),
            Self::EmptyReply => write!(f, "reply carried no result fields"),
        }
    }
}

/// Outcome of one weather fetch. Both variants carry a fully populated
/// report; the split keeps the silent-fallback path explicit and testable.
#[derive(Debug, Clone)]
pub enum WeatherOutcome {
    Parsed(WeatherReport),
    FellBack {
        report: WeatherReport,
        reason: FallbackReason,
    },
}

impl WeatherOutcome {
    pub fn report(&self) -> &WeatherReport {
        match self {
            Self::Parsed(report) => report,
            Self::FellBack { report, .. } => report,
        }
    }

    pub fn into_report(self) -> WeatherReport {
        match self {
            Self::Parsed(report) => report,
            Self::FellBack { report, .. } => report,
        }
    }
}

/// Fetch current weather for `location` through the workflow engine.
///
/// Only the initial trigger can fail; everything downstream degrades to
/// default values instead of surfacing an error. When the engine answers
/// with its asynchronous acknowledgement, this waits the client's poll delay
/// and attempts exactly one `/result` follow-up.
pub async fn current_weather(client: &WorkflowClient, location: &str) -> Result<WeatherOutcome> {
    let reply = client.trigger_tool(WEATHER_TOOL_ID, location).await?;

    match classify(reply) {
        WorkflowReply::Started => {
            debug!(location, "workflow started, waiting for completion");
            sleep(client.started_poll_delay()).await;
            match client.fetch_result(WEATHER_TOOL_ID, location).await {
                Ok(result) => {
                    // The follow-up body is normalized as-is, without
                    // another classification pass.
                    let payload = result.as_object().cloned().unwrap_or_default();
                    Ok(WeatherOutcome::Parsed(normalize_weather(&payload, location)))
                }
                Err(err) => {
                    warn!(location, error = %err, "no workflow result available, using fallback data");
                    Ok(WeatherOutcome::FellBack {
                        report: normalize_weather(&Map::new(), location),
                        reason: FallbackReason::ResultUnavailable(err.to_string()),
                    })
                }
            }
        }
        WorkflowReply::Immediate(payload) | WorkflowReply::Nested(payload) => {
            Ok(WeatherOutcome::Parsed(normalize_weather(&payload, location)))
        }
        WorkflowReply::Empty => {
            warn!(location, "workflow reply carried no weather data, using fallback data");
            Ok(WeatherOutcome::FellBack {
                report: normalize_weather(&Map::new(), location),
                reason: FallbackReason::EmptyReply,
            })
        }
    }
}
