use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of one upload attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUploadResult {
    pub success: bool,
    pub message: String,
    pub file_name: String,
    pub file_size: u64,
    pub file_type: String,
}

/// An upload handed over by the host application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpload {
    pub file_name: String,
    /// Size in bytes as reported by the host.
    pub file_size: u64,
    /// MIME type.
    pub file_type: String,
    /// Base64-encoded content.
    pub file_content: String,
}

/// Accept an upload and acknowledge it. Persisting the content is the host's
/// concern; this records the metadata and reports success.
pub fn handle_upload(upload: &FileUpload) -> FileUploadResult {
    info!(
        file_name = %upload.file_name,
        file_size = upload.file_size,
        file_type = %upload.file_type,
        content_length = upload.file_content.len(),
        "file upload received"
    );

    FileUploadResult {
        success: true,
        message: format!("File \"{}\" uploaded successfully!", upload.file_name),
        file_name: upload.file_name.clone(),
        file_size: upload.file_size,
        file_type: upload.file_type.clone(),
    }
}
