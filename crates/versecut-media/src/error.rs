//! Error types for footage discovery and probing.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for footage operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while discovering or probing clips.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Invalid video file: {0}")]
    InvalidVideo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}
