//! Error types for the assembly core.

use thiserror::Error;
use versecut_models::TimestampError;

/// Result type for assembly operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while assembling a run.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Malformed marker input at line {line}: {reason}")]
    MalformedMarkerInput { line: usize, reason: String },

    #[error("Verse {verse_index} background clip {path} width ({clip_width}) is less than video width ({video_width})")]
    ClipTooNarrow {
        verse_index: u32,
        path: String,
        clip_width: u32,
        video_width: u32,
    },

    #[error("Insufficient footage for verse {verse_index}: {required:.2}s still uncovered")]
    InsufficientFootage { verse_index: u32, required: f64 },

    #[error("Timestamp error: {0}")]
    Timestamp(#[from] TimestampError),
}

impl EngineError {
    /// Create a malformed marker input error.
    pub fn malformed_marker(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedMarkerInput {
            line,
            reason: reason.into(),
        }
    }
}
