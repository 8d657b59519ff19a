use std::sync::Arc;

use anyhow::{anyhow, Result};
use assistant_core::{
    LocalPages, MeteoClient, PageBackend, WeatherProvider, WorkflowPages, WorkflowWeather,
};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use workflow_bridge::WorkflowClient;

/// Which implementation backs the assistant's tools.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Backend {
    /// Direct calls and in-process simulation.
    #[serde(rename = "local")]
    Local,
    /// Everything delegated to the external workflow engine.
    #[serde(rename = "workflow")]
    Workflow,
}

impl Backend {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "local" => Some(Self::Local),
            "workflow" => Some(Self::Workflow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingPolicy {
    #[serde(default)]
    pub force_backend: Option<Backend>,
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("requested backend is not configured: {0:?}")]
    BackendUnavailable(Backend),
}

/// Chooses and constructs the tool backends for the assistant runtime.
#[derive(Clone)]
pub struct ToolRouter {
    default_backend: Backend,
    workflow: Option<WorkflowClient>,
}

impl ToolRouter {
    pub fn new(default_backend: Backend, workflow: Option<WorkflowClient>) -> Self {
        Self {
            default_backend,
            workflow,
        }
    }

    /// Build a router from `BACKEND_TYPE`, `WORKFLOW_API_URL`, and
    /// `WORKFLOW_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let default_backend = std::env::var("BACKEND_TYPE")
            .ok()
            .as_deref()
            .and_then(Backend::parse)
            .unwrap_or(Backend::Local);

        let workflow = match std::env::var("WORKFLOW_API_URL") {
            Ok(raw) => {
                let url = Url::parse(&raw)
                    .map_err(|err| anyhow!("invalid WORKFLOW_API_URL: {err}"))?;
                let mut builder = WorkflowClient::builder().base_url(url);
                if let Ok(key) = std::env::var("WORKFLOW_API_KEY") {
                    builder = builder.api_key(key);
                }
                Some(builder.build()?)
            }
            Err(_) => None,
        };

        Ok(Self::new(default_backend, workflow))
    }

    pub fn backend(&self, policy: &RoutingPolicy) -> Backend {
        policy.force_backend.unwrap_or(self.default_backend)
    }

    pub fn workflow_available(&self) -> bool {
        self.workflow.is_some()
    }

    pub fn weather_provider(&self, policy: &RoutingPolicy) -> Result<Arc<dyn WeatherProvider>> {
        match self.backend(policy) {
            Backend::Local => Ok(Arc::new(MeteoClient::new()?)),
            Backend::Workflow => Ok(Arc::new(WorkflowWeather::new(self.workflow_client()?))),
        }
    }

    pub fn page_backend(&self, policy: &RoutingPolicy) -> Result<Arc<dyn PageBackend>> {
        match self.backend(policy) {
            Backend::Local => Ok(Arc::new(LocalPages::new())),
            Backend::Workflow => Ok(Arc::new(WorkflowPages::new(self.workflow_client()?))),
        }
    }

    fn workflow_client(&self) -> Result<WorkflowClient> {
        self.workflow
            .clone()
            .ok_or_else(|| anyhow!(RouterError::BackendUnavailable(Backend::Workflow)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow_client() -> WorkflowClient {
        WorkflowClient::builder()
            .base_url(Url::parse("http://workflow.test").unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn parses_backend_names() {
        assert_eq!(Backend::parse("local"), Some(Backend::Local));
        assert_eq!(Backend::parse("workflow"), Some(Backend::Workflow));
        assert_eq!(Backend::parse("remote"), None);
    }

    #[test]
    fn policy_can_force_a_backend() {
        let router = ToolRouter::new(Backend::Local, Some(workflow_client()));
        let policy = RoutingPolicy {
            force_backend: Some(Backend::Workflow),
        };
        assert_eq!(router.backend(&policy), Backend::Workflow);
        assert_eq!(router.backend(&RoutingPolicy::default()), Backend::Local);
    }

    #[test]
    fn local_backend_needs_no_workflow_client() {
        let router = ToolRouter::new(Backend::Local, None);
        assert!(router.weather_provider(&RoutingPolicy::default()).is_ok());
        assert!(router.page_backend(&RoutingPolicy::default()).is_ok());
    }

    #[test]
    fn unconfigured_workflow_backend_is_an_error() {
        let router = ToolRouter::new(Backend::Workflow, None);
        let err = router
            .page_backend(&RoutingPolicy::default())
            .expect_err("workflow backend should be unavailable");
        assert!(format!("{err}").contains("not configured"));
    }

    #[test]
    fn configured_workflow_backend_resolves() {
        let router = ToolRouter::new(Backend::Workflow, Some(workflow_client()));
        assert!(router.workflow_available());
        assert!(router.weather_provider(&RoutingPolicy::default()).is_ok());
        assert!(router.page_backend(&RoutingPolicy::default()).is_ok());
    }
}
