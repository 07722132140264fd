//! Error types for PPD

use thiserror::Error;

/// Result type alias for PPD operations
pub type Result<T> = std::result::Result<T, PpdError>;

/// Main error type for PPD
#[derive(Error, Debug)]
pub enum PpdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}
