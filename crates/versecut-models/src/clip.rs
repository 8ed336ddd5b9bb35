//! Candidate clips, chosen segments, and the persisted allocation map.

use std::collections::BTreeMap;
use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A background clip discovered in the footage pool.
///
/// Immutable for the run once discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CandidateClip {
    /// Path to the clip file.
    pub path: PathBuf,
    /// Duration in seconds at normal speed.
    pub total_duration: f64,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Total number of frames (for image-mode frame picks).
    pub frame_count: u64,
}

impl CandidateClip {
    /// Playback duration after the speed multiplier is applied.
    pub fn effective_duration(&self, speed: f64) -> f64 {
        self.total_duration / speed
    }
}

/// A validated slice of background footage covering part of a verse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipSegment {
    /// Path of the source clip.
    pub path: String,
    /// Seconds trimmed from the start of the clip.
    pub time_offset: f64,
    /// Horizontal crop offset in pixels.
    pub horizontal_offset: u32,
    /// Whether the clip is mirrored horizontally.
    pub mirrored: bool,
}

/// An ordered list of segments covering one verse's duration.
pub type VerseAllocation = Vec<ClipSegment>;

/// Wire tuple shape of one recorded segment:
/// `[path, time_offset, horizontal_offset, "True"|"False"]`.
type SegmentTuple = (String, f64, i64, String);

/// One segment as persisted in an allocation map document.
///
/// Fields are carried as written: offsets may be out of range and the
/// mirrored label may be garbage. Replay validates each field against the
/// current pool and regenerates anything invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SegmentTuple", from = "SegmentTuple")]
pub struct RecordedSegment {
    pub path: String,
    pub time_offset: f64,
    pub horizontal_offset: i64,
    pub mirrored: String,
}

impl RecordedSegment {
    /// Interpret the mirrored label, if it is boolean-like.
    pub fn mirrored_flag(&self) -> Option<bool> {
        match self.mirrored.as_str() {
            "True" => Some(true),
            "False" => Some(false),
            _ => None,
        }
    }
}

impl From<SegmentTuple> for RecordedSegment {
    fn from((path, time_offset, horizontal_offset, mirrored): SegmentTuple) -> Self {
        Self {
            path,
            time_offset,
            horizontal_offset,
            mirrored,
        }
    }
}

impl From<RecordedSegment> for SegmentTuple {
    fn from(segment: RecordedSegment) -> Self {
        (
            segment.path,
            segment.time_offset,
            segment.horizontal_offset,
            segment.mirrored,
        )
    }
}

impl From<ClipSegment> for RecordedSegment {
    fn from(segment: ClipSegment) -> Self {
        Self {
            path: segment.path,
            time_offset: segment.time_offset,
            horizontal_offset: i64::from(segment.horizontal_offset),
            mirrored: mirrored_label(segment.mirrored).to_string(),
        }
    }
}

/// Wire label for a mirror flag.
pub fn mirrored_label(mirrored: bool) -> &'static str {
    if mirrored {
        "True"
    } else {
        "False"
    }
}

/// Persisted record of every allocation decision in a run, keyed by
/// 1-based verse-clip index.
///
/// Once an index has a recorded allocation, that allocation is authoritative
/// for the index on replay unless a field fails validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationMap(BTreeMap<u32, Vec<RecordedSegment>>);

impl AllocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the allocation for a verse index, replacing any prior entry.
    pub fn insert(&mut self, index: u32, segments: Vec<RecordedSegment>) {
        self.0.insert(index, segments);
    }

    pub fn get(&self, index: u32) -> Option<&[RecordedSegment]> {
        self.0.get(&index).map(Vec::as_slice)
    }

    pub fn contains(&self, index: u32) -> bool {
        self.0.contains_key(&index)
    }

    /// Entries in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[RecordedSegment])> {
        self.0.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(u32, Vec<RecordedSegment>)> for AllocationMap {
    fn from_iter<T: IntoIterator<Item = (u32, Vec<RecordedSegment>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
