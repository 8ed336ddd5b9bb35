//! Structured run logging utilities.
//!
//! Provides consistent, structured logging for assembly runs with
//! tracing spans and contextual information.

use tracing::{error, info, warn, Span};

/// Run logger for structured logging with consistent formatting.
///
/// Every run gets a generated ID so log lines from interleaved runs
/// can be told apart.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    chapter: u32,
}

impl RunLogger {
    /// Create a new logger for a run over the given chapter.
    pub fn new(chapter: u32) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            chapter,
        }
    }

    /// Log the start of a run.
    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            chapter = self.chapter,
            "Run started: {}", message
        );
    }

    /// Log a progress update during the run.
    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            chapter = self.chapter,
            "Run progress: {}", message
        );
    }

    /// Log a warning during the run.
    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            chapter = self.chapter,
            "Run warning: {}", message
        );
    }

    /// Log an error during the run.
    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            chapter = self.chapter,
            "Run error: {}", message
        );
    }

    /// Log the completion of the run.
    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            chapter = self.chapter,
            "Run completed: {}", message
        );
    }

    /// Get the run ID.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Create a tracing span for this run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "assembly_run",
            run_id = %self.run_id,
            chapter = self.chapter
        )
    }
}
