//! Shared data models for the VerseCut assembly engine.
//!
//! This crate provides Serde-serializable types for:
//! - Timestamps and timing boundaries
//! - Verse table rows
//! - Candidate clips, segments, and the allocation map
//! - Run requests, settings, and render plans

pub mod boundary;
pub mod clip;
pub mod render;
pub mod request;
pub mod settings;
pub mod timestamp;
pub mod verse;

// Re-export common types
pub use boundary::TimingBoundary;
pub use clip::{
    mirrored_label, AllocationMap, CandidateClip, ClipSegment, RecordedSegment, VerseAllocation,
};
pub use render::{RenderPlan, RenderRow};
pub use request::{RunRequest, TranslationSettings};
pub use settings::{TimeModifiers, VideoMode, VideoSettings};
pub use timestamp::{
    format_timestamp, offset_timestamp, parse_timestamp, time_difference, TimestampError,
};
pub use verse::{TableColumns, VerseRow};
