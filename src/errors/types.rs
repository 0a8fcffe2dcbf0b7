use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("Invalid repository reference: {0}")]
    InvalidRepository(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
