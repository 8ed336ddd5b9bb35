//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while reading or writing run artifacts.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Verse table error: {0}")]
    Table(String),

    #[error("Column not found in verse table: {0}")]
    ColumnNotFound(String),

    #[error("Verse not found in verse table: {0}")]
    VerseNotFound(String),

    #[error("Malformed allocation map at {path}: {reason}")]
    MalformedMap { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn table(msg: impl Into<String>) -> Self {
        Self::Table(msg.into())
    }

    pub fn malformed_map(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedMap {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
