//! Worker configuration.

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Path of the run request document
    pub request_path: String,
    /// Base URL of the canonical text service
    pub text_api_base: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            request_path: "run.json".to_string(),
            text_api_base: "https://api.quran.com/api/v4".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            request_path: std::env::var("VERSECUT_REQUEST")
                .unwrap_or_else(|_| "run.json".to_string()),
            text_api_base: std::env::var("VERSECUT_TEXT_API")
                .unwrap_or_else(|_| "https://api.quran.com/api/v4".to_string()),
        }
    }
}
