//! Verse-to-media assembly worker.
//!
//! This crate provides:
//! - The end-to-end assembly pipeline for a run request
//! - A canonical text service client
//! - Worker configuration and structured run logging

pub mod canonical;
pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use canonical::{CanonicalTextClient, CanonicalTextProvider};
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::RunLogger;
pub use pipeline::{run, RunOutcome};
