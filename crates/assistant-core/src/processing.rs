use serde::{Deserialize, Serialize};

/// Outcome of processing one uploaded file against a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProcessingResult {
    pub success: bool,
    /// Page the result should be displayed on. Carried through untouched.
    pub page_id: String,
    pub file_name: String,
    pub prompt: String,
    pub result: String,
    pub processed_content: String,
    pub message: String,
}

/// Request to process an uploaded file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessFileRequest {
    /// Base64-encoded content.
    pub file_content: String,
    pub file_name: String,
    /// MIME type.
    pub file_type: String,
    pub prompt: String,
    pub page_id: String,
}

// Base64 expands content by 4/3; estimate the decoded size from the encoded
// length.
fn estimated_size_kb(base64_len: usize) -> String {
    format!("{:.1}", base64_len as f64 * 0.75 / 1024.0)
}

/// Simulate AI processing of an uploaded file. The prompt picks one of three
/// canned responses: TLDR/summary, charts, or generic processing.
pub fn process_locally(request: &ProcessFileRequest) -> FileProcessingResult {
    let prompt = request.prompt.to_lowercase();
    let size_kb = estimated_size_kb(request.file_content.len());

    let (result, processed_content) = if prompt.contains("tldr") || prompt.contains("summary") {
        (
            "TLDR Generated",
            format!(
                "# Summary of {name}\n\nThis is a simulated TLDR/summary of your file. In a real implementation, the AI would analyze the file content and provide an actual summary based on the prompt: \"{prompt}\"\n\n**File Details:**\n- Name: {name}\n- Type: {kind}\n- Size: {size} KB (estimated)\n\n**Processing Prompt:** {prompt}",
                name = request.file_name,
                kind = request.file_type,
                size = size_kb,
                prompt = request.prompt,
            ),
        )
    } else if prompt.contains("chart") || prompt.contains("graph") {
        (
            "Charts Generated",
            format!(
                "# Data Visualization for {name}\n\nThis is a simulated chart generation result. In a real implementation, the AI would analyze the file data and create appropriate visualizations.\n\n**File Details:**\n- Name: {name}\n- Type: {kind}\n- Size: {size} KB (estimated)\n\n**Processing Prompt:** {prompt}\n\n*Note: This is a placeholder. Real implementation would generate actual charts and graphs.*",
                name = request.file_name,
                kind = request.file_type,
                size = size_kb,
                prompt = request.prompt,
            ),
        )
    } else {
        (
            "File Processed",
            format!(
                "# Processed: {name}\n\nThis is a simulated processing result. The AI would analyze your file based on the prompt: \"{prompt}\"\n\n**File Details:**\n- Name: {name}\n- Type: {kind}\n- Size: {size} KB (estimated)\n\n**Processing Prompt:** {prompt}\n\n*Note: This is a placeholder. Real implementation would process the file content with AI.*",
                name = request.file_name,
                kind = request.file_type,
                size = size_kb,
                prompt = request.prompt,
            ),
        )
    };

    FileProcessingResult {
        success: true,
        page_id: request.page_id.clone(),
        file_name: request.file_name.clone(),
        prompt: request.prompt.clone(),
        result: result.to_string(),
        processed_content,
        message: format!(
            "File \"{}\" processed successfully with prompt: \"{}\"",
            request.file_name, request.prompt
        ),
    }
}
