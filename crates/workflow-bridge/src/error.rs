/// Convenient result alias for workflow-engine operations.
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Errors that can occur while talking to the workflow engine.
#[derive(thiserror::Error, Debug)]
pub enum WorkflowError {
    /// Network request to the engine failed or returned a non-success status.
    #[error("workflow request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The engine reply could not be decoded as JSON.
    #[error("workflow reply decoding failed: {0}")]
    Decode(#[from] serde_json::Error),
    /// An execution reply did not carry the expected `data` field.
    #[error("workflow {0} returned no data field")]
    MissingData(String),
    /// The configured base URL was invalid.
    #[error("invalid workflow URL: {0}")]
    InvalidUrl(String),
}
