use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use async_trait::async_trait;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::info;
use workflow_bridge::WorkflowClient;

use crate::processing::{process_locally, FileProcessingResult, ProcessFileRequest};

pub const CREATE_PAGE_WORKFLOW_ID: &str = "create-page-workflow";
pub const PROCESS_FILE_WORKFLOW_ID: &str = "process-file-workflow";

/// Outcome of creating a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCreationResult {
    /// Opaque identifier for the new page.
    pub page_id: String,
    pub title: String,
    pub description: String,
    pub page_type: String,
    pub success: bool,
}

/// Request to create a page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page_type: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Destination for page creation and file processing.
#[async_trait]
pub trait PageBackend: std::fmt::Debug + Send + Sync {
    async fn create_page(&self, request: PageRequest) -> Result<PageCreationResult>;
    async fn process_file(&self, request: ProcessFileRequest) -> Result<FileProcessingResult>;
}

// Millisecond timestamp plus nine random lowercase alphanumerics.
fn generate_page_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect();
    format!("page_{millis}_{suffix}")
}

/// In-process backend: pages live in a session registry and processing is
/// simulated locally.
#[derive(Default, Debug)]
pub struct LocalPages {
    registry: Arc<Mutex<HashMap<String, PageCreationResult>>>,
}

impl LocalPages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a previously created page.
    pub async fn page(&self, page_id: &str) -> Option<PageCreationResult> {
        self.registry.lock().await.get(page_id).cloned()
    }
}

#[async_trait]
impl PageBackend for LocalPages {
    async fn create_page(&self, request: PageRequest) -> Result<PageCreationResult> {
        let page_id = generate_page_id();
        info!(
            page_id = %page_id,
            page_type = %request.page_type,
            title = %request.title,
            "creating new page"
        );

        let description = request.description.unwrap_or_else(|| {
            format!(
                "A {} page for processing files and generating content",
                request.page_type
            )
        });
        let page = PageCreationResult {
            page_id: page_id.clone(),
            title: request.title,
            description,
            page_type: request.page_type,
            success: true,
        };
        self.registry.lock().await.insert(page_id, page.clone());
        Ok(page)
    }

    async fn process_file(&self, request: ProcessFileRequest) -> Result<FileProcessingResult> {
        // The page id is carried through untouched; it is not checked
        // against the registry.
        info!(
            file_name = %request.file_name,
            page_id = %request.page_id,
            prompt = %request.prompt,
            "processing file"
        );
        Ok(process_locally(&request))
    }
}

/// Workflow-engine backend: both operations delegate to named workflows and
/// trust the returned `data` to match the result schema.
#[derive(Debug)]
pub struct WorkflowPages {
    client: WorkflowClient,
}

impl WorkflowPages {
    pub fn new(client: WorkflowClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageBackend for WorkflowPages {
    async fn create_page(&self, request: PageRequest) -> Result<PageCreationResult> {
        let data = self
            .client
            .execute_workflow(
                CREATE_PAGE_WORKFLOW_ID,
                json!({
                    "pageType": request.page_type,
                    "title": request.title,
                    "description": request.description,
                }),
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn process_file(&self, request: ProcessFileRequest) -> Result<FileProcessingResult> {
        let data = self
            .client
            .execute_workflow(
                PROCESS_FILE_WORKFLOW_ID,
                json!({
                    "fileContent": request.file_content,
                    "fileName": request.file_name,
                    "fileType": request.file_type,
                    "prompt": request.prompt,
                    "pageId": request.page_id,
                }),
            )
            .await?;
        Ok(serde_json::from_value(data)?)
    }
}
