use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset preparation operations
pub type PrepResult<T> = Result<T, PrepError>;

/// Error types for dataset preparation operations
#[derive(Error, Debug)]
pub enum PrepError {
    /// Input directory or file does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    /// Image could not be opened or decoded
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Image could not be encoded or written
    #[error("Failed to save image at '{0}': {1}")]
    ImageSave(PathBuf, String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart window could not be started
    #[error("Viewer error: {0}")]
    Viewer(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
