//! Run settings controlling clip allocation and output geometry.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How verse visuals are assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// Cover each verse window with trimmed video segments.
    Video,
    /// Hold a single still frame per verse window.
    Image,
}

impl Default for VideoMode {
    fn default() -> Self {
        VideoMode::Video
    }
}

/// Allocation and geometry settings for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoSettings {
    /// Allow a clip to be picked again before the pool is exhausted.
    #[serde(default)]
    pub allow_duplicate_clips: bool,
    /// Allow segments to be mirrored horizontally.
    #[serde(default = "default_allow_mirrored")]
    pub allow_mirrored_clips: bool,
    /// Playback speed multiplier applied to background clips.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Shortest acceptable segment duration in seconds.
    #[serde(default = "default_min_clip_duration")]
    pub min_clip_duration: f64,
    /// Output frame width in pixels.
    #[serde(default = "default_video_width")]
    pub video_width: u32,
    /// Output frame height in pixels.
    #[serde(default = "default_video_height")]
    pub video_height: u32,
    #[serde(default)]
    pub mode: VideoMode,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            allow_duplicate_clips: false,
            allow_mirrored_clips: default_allow_mirrored(),
            speed: default_speed(),
            min_clip_duration: default_min_clip_duration(),
            video_width: default_video_width(),
            video_height: default_video_height(),
            mode: VideoMode::default(),
        }
    }
}

impl VideoSettings {
    /// Validate the settings, returning an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.speed <= 0.0 {
            return Err("speed must be positive".to_string());
        }
        if self.min_clip_duration <= 0.0 {
            return Err("min_clip_duration must be positive".to_string());
        }
        if self.video_width == 0 || self.video_height == 0 {
            return Err("video dimensions must be non-zero".to_string());
        }
        Ok(())
    }
}

/// Offsets applied to table timestamps when cutting verse windows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeModifiers {
    /// Offset in seconds applied to every boundary.
    #[serde(default = "default_time_offset")]
    pub time_offset: f64,
    /// Offset applied to the closing boundary of the run.
    #[serde(default)]
    pub end_offset: f64,
    /// Offset applied to the opening boundary of the run, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<f64>,
}

impl Default for TimeModifiers {
    fn default() -> Self {
        Self {
            time_offset: default_time_offset(),
            end_offset: 0.0,
            start_offset: None,
        }
    }
}

impl TimeModifiers {
    /// Offset for the opening boundary, falling back to the base offset.
    pub fn effective_start_offset(&self) -> f64 {
        self.start_offset.unwrap_or(self.time_offset)
    }
}

fn default_allow_mirrored() -> bool {
    true
}

fn default_speed() -> f64 {
    1.0
}

fn default_min_clip_duration() -> f64 {
    1.0
}

fn default_video_width() -> u32 {
    576
}

fn default_video_height() -> u32 {
    1024
}

fn default_time_offset() -> f64 {
    -0.2
}
