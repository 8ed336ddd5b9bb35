//! Run artifact persistence.
//!
//! This crate provides:
//! - Tab-delimited verse table parsing and editing
//! - Timestamp, translation, and verse number column updates
//! - Loop range resolution over a verse span
//! - Allocation map files for replayable runs

pub mod allocation_map;
pub mod error;
pub mod verse_table;

pub use allocation_map::{load_map, parse_map, render_map, save_map};
pub use error::{StoreError, StoreResult};
pub use verse_table::VerseTable;
