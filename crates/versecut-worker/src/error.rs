//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    #[error("Text service request failed: {0}")]
    TextApiFailed(String),

    #[error("Verse table data error: {0}")]
    TableData(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Assembly error: {0}")]
    Engine(#[from] versecut_engine::EngineError),

    #[error("Media error: {0}")]
    Media(#[from] versecut_media::MediaError),

    #[error("Store error: {0}")]
    Store(#[from] versecut_store::StoreError),

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] versecut_models::TimestampError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn text_api_failed(msg: impl Into<String>) -> Self {
        Self::TextApiFailed(msg.into())
    }

    pub fn table_data(msg: impl Into<String>) -> Self {
        Self::TableData(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
