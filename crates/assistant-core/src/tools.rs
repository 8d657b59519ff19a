use std::sync::Arc;

use agent_kit::{Tool, ToolDescription, ToolError, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::pages::{PageBackend, PageRequest};
use crate::processing::ProcessFileRequest;
use crate::weather::WeatherProvider;

fn build_description(name: &str, description: &str, schema: Value) -> ToolDescription {
    ToolDescription::new(name.to_string(), description.to_string(), schema)
}

pub fn build_weather_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "location": { "type": "string", "description": "City name" }
        },
        "required": ["location"],
        "additionalProperties": false
    })
}

pub fn build_upload_schema() -> Value {
    json!({
        "type": "object",
        "properties": {},
        "additionalProperties": false
    })
}

pub fn build_create_page_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "pageType": { "type": "string", "description": "Type of page to create (e.g., \"file-processor\", \"document-analyzer\")" },
            "title": { "type": "string", "description": "Title for the new page" },
            "description": { "type": "string", "description": "Optional description of the page purpose" }
        },
        "required": ["pageType", "title"],
        "additionalProperties": false
    })
}

pub fn build_process_file_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "fileContent": { "type": "string", "description": "Base64 encoded file content" },
            "fileName": { "type": "string", "description": "Name of the file" },
            "fileType": { "type": "string", "description": "MIME type of the file" },
            "prompt": { "type": "string", "description": "How to process the file (e.g., \"make a TLDR\", \"create charts\", \"summarize\")" },
            "pageId": { "type": "string", "description": "ID of the page where results should be displayed" }
        },
        "required": ["fileContent", "fileName", "fileType", "prompt", "pageId"],
        "additionalProperties": false
    })
}

#[derive(Clone)]
pub struct WeatherTool {
    provider: Arc<dyn WeatherProvider>,
    description: ToolDescription,
}

impl WeatherTool {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            provider,
            description: build_description(
                "weather.current",
                "Get current weather for a location",
                build_weather_schema(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherArgs {
    location: String,
}

#[async_trait]
impl Tool for WeatherTool {
    fn description(&self) -> &ToolDescription {
        &self.description
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, ToolError> {
        let params: WeatherArgs = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidInput(format!("invalid arguments: {e}")))?;
        if params.location.trim().is_empty() {
            return Err(ToolError::InvalidInput("location must not be empty".into()));
        }

        let report = self
            .provider
            .current_weather(params.location.trim())
            .await
            .map_err(|e| ToolError::Invocation(format!("failed to get weather: {e}")))?;

        let content = serde_json::to_value(&report)
            .map_err(|e| ToolError::Invocation(format!("failed to encode weather report: {e}")))?;
        Ok(ToolResult {
            content,
            metadata: Default::default(),
        })
    }
}

#[derive(Clone)]
pub struct FileUploadTool {
    description: ToolDescription,
}

impl FileUploadTool {
    pub fn new() -> Self {
        Self {
            description: build_description(
                "files.upload",
                "Show file upload interface to the user",
                build_upload_schema(),
            ),
        }
    }
}

impl Default for FileUploadTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FileUploadTool {
    fn description(&self) -> &ToolDescription {
        &self.description
    }

    async fn invoke(&self, _args: Value) -> Result<ToolResult, ToolError> {
        // The actual upload happens through the host application's action;
        // this only surfaces the interface.
        Ok(ToolResult {
            content: json!({
                "message": "File upload interface is now available. Please select a file to upload."
            }),
            metadata: Default::default(),
        })
    }
}

#[derive(Clone)]
pub struct CreatePageTool {
    backend: Arc<dyn PageBackend>,
    description: ToolDescription,
}

impl CreatePageTool {
    pub fn new(backend: Arc<dyn PageBackend>) -> Self {
        Self {
            backend,
            description: build_description(
                "pages.create",
                "Create a new page for file processing and content generation",
                build_create_page_schema(),
            ),
        }
    }
}

#[async_trait]
impl Tool for CreatePageTool {
    fn description(&self) -> &ToolDescription {
        &self.description
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, ToolError> {
        let request: PageRequest = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidInput(format!("invalid arguments: {e}")))?;
        if request.title.trim().is_empty() {
            return Err(ToolError::InvalidInput("title must not be empty".into()));
        }

        let page = self
            .backend
            .create_page(request)
            .await
            .map_err(|e| ToolError::Invocation(format!("failed to create page: {e}")))?;

        let content = serde_json::to_value(&page)
            .map_err(|e| ToolError::Invocation(format!("failed to encode page result: {e}")))?;
        Ok(ToolResult {
            content,
            metadata: Default::default(),
        })
    }
}

#[derive(Clone)]
pub struct ProcessFileTool {
    backend: Arc<dyn PageBackend>,
    description: ToolDescription,
}

impl ProcessFileTool {
    pub fn new(backend: Arc<dyn PageBackend>) -> Self {
        Self {
            backend,
            description: build_description(
                "files.process",
                "Process an uploaded file with a user prompt using AI",
                build_process_file_schema(),
            ),
        }
    }
}

#[async_trait]
impl Tool for ProcessFileTool {
    fn description(&self) -> &ToolDescription {
        &self.description
    }

    async fn invoke(&self, args: Value) -> Result<ToolResult, ToolError> {
        let request: ProcessFileRequest = serde_json::from_value(args)
            .map_err(|e| ToolError::InvalidInput(format!("invalid arguments: {e}")))?;

        let result = self
            .backend
            .process_file(request)
            .await
            .map_err(|e| ToolError::Invocation(format!("failed to process file: {e}")))?;

        let content = serde_json::to_value(&result).map_err(|e| {
            ToolError::Invocation(format!("failed to encode processing result: {e}"))
        })?;
        Ok(ToolResult {
            content,
            metadata: Default::default(),
        })
    }
}
