//! Timed verse-to-media assembly core.
//!
//! This crate provides:
//! - Marker export reconciliation into ordered timing boundaries
//! - Fuzzy verse alignment against canonical chapter text
//! - Constrained randomized clip allocation with replay support
//! - Recording of allocation decisions for later replay

pub mod align;
pub mod allocate;
pub mod decision;
pub mod error;
pub mod markers;
pub mod recorder;

pub use align::{align_rows, AlignReport, CanonicalVerse};
pub use allocate::ClipAllocator;
pub use decision::{DecisionProvider, RandomDecisions, ReplayDecisions};
pub use error::{EngineError, EngineResult};
pub use markers::reconcile_markers;
pub use recorder::AllocationRecorder;
