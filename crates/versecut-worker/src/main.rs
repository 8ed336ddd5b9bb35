//! Verse-to-media assembly worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use versecut_models::RunRequest;
use versecut_worker::{pipeline, CanonicalTextClient, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter =
        EnvFilter::from_default_env().add_directive("versecut=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting versecut-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let request_text = match tokio::fs::read_to_string(&config.request_path).await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read run request {}: {}", config.request_path, e);
            std::process::exit(1);
        }
    };

    let request: RunRequest = match serde_json::from_str(&request_text) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to parse run request: {}", e);
            std::process::exit(1);
        }
    };

    let provider = CanonicalTextClient::new(config.text_api_base.clone());

    match pipeline::run(&request, &provider).await {
        Ok(outcome) => {
            info!(
                run_id = %outcome.run_id,
                verses = outcome.verses,
                segments = outcome.segments,
                unresolved_rows = outcome.unresolved_rows,
                "Assembly finished covering {:.2}s",
                outcome.total_duration
            );
        }
        Err(e) => {
            error!("Assembly failed: {}", e);
            std::process::exit(1);
        }
    }
}
