//! Render plan handed to the downstream compositor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::clip::ClipSegment;
use crate::settings::VideoMode;

/// One verse window with its allocated visuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderRow {
    /// 1-based index within the run, matching the allocation map key.
    pub index: u32,

    /// Verse label, blank for continuation rows.
    pub verse_number: String,

    /// Verse text shown during this window.
    pub verse_text: String,

    /// Translation shown alongside, when the table carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_translation: Option<String>,

    /// Window start, offset-adjusted, as `MM:SS.mmm`.
    pub start: String,

    /// Window end, offset-adjusted, as `MM:SS.mmm`.
    pub end: String,

    /// Window length in seconds.
    pub duration: f64,

    /// How long the verse text stays on screen. Shorter than `duration`
    /// when the next row carries an early text cut.
    pub text_duration: f64,

    /// Background segments covering the window, in playback order.
    pub segments: Vec<ClipSegment>,

    /// Still frame to hold in image mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_index: Option<u64>,
}

/// Complete instructions for compositing one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RenderPlan {
    /// Output frame width in pixels.
    pub video_width: u32,

    /// Output frame height in pixels.
    pub video_height: u32,

    pub mode: VideoMode,

    /// Playback speed multiplier for background segments.
    pub speed: f64,

    /// Audio track to lay under the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,

    /// Verse windows in playback order.
    pub rows: Vec<RenderRow>,
}

impl RenderPlan {
    /// Total run length in seconds.
    pub fn total_duration(&self) -> f64 {
        self.rows.iter().map(|row| row.duration).sum()
    }

    /// Total number of background segments across all rows.
    pub fn segment_count(&self) -> usize {
        self.rows.iter().map(|row| row.segments.len()).sum()
    }
}
