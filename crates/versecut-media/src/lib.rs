//! Footage pool discovery for VerseCut.
//!
//! This crate provides:
//! - Recursive clip discovery in a footage directory
//! - FFprobe-backed clip metadata (duration, dimensions, frame count)

pub mod error;
pub mod pool;
pub mod probe;

pub use error::{MediaError, MediaResult};
pub use pool::{collect_clip_paths, scan_pool};
pub use probe::probe_candidate;
