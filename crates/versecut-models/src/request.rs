//! Run request describing one verse-to-media assembly.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::settings::{TimeModifiers, VideoSettings};
use crate::verse::TableColumns;

/// Translation column to fetch and fill in the verse table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TranslationSettings {
    /// Translation resource identifier on the text service.
    pub id: String,
    /// Column title for the translation in the verse table.
    pub column: String,
}

/// Everything needed for one assembly run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RunRequest {
    /// Chapter number of the verses being assembled.
    pub chapter: u32,

    /// First verse of the run.
    pub start_verse: u32,

    /// Last verse of the run.
    pub end_verse: u32,

    /// Editor marker export to reconcile into the verse table, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_export: Option<PathBuf>,

    /// Path to the tab-delimited verse table.
    pub verse_table: PathBuf,

    /// Directory scanned recursively for background clips.
    pub clips_dir: PathBuf,

    /// Audio track carried into the render plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,

    /// Output video path. The allocation map and render plan are written
    /// next to it with `.json` and `.plan.json` extensions.
    pub output_video: PathBuf,

    /// Translation column to fetch, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationSettings>,

    /// Allocation map from a previous run to replay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_map: Option<PathBuf>,

    /// Explicit first table row (1-based), overriding the verse lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_row: Option<usize>,

    /// Explicit last table row (1-based), overriding the verse lookup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_row: Option<usize>,

    /// Column titles used by the verse table.
    #[serde(default)]
    pub columns: TableColumns,

    #[serde(default)]
    pub settings: VideoSettings,

    #[serde(default)]
    pub time_modifiers: TimeModifiers,
}

impl RunRequest {
    /// Verse label opening the run, e.g. `"2:255"`.
    pub fn start_label(&self) -> String {
        format!("{}:{}", self.chapter, self.start_verse)
    }

    /// Verse label closing the run.
    pub fn end_label(&self) -> String {
        format!("{}:{}", self.chapter, self.end_verse)
    }

    /// Where the allocation map document is written.
    pub fn map_path(&self) -> PathBuf {
        self.output_video.with_extension("json")
    }

    /// Where the render plan is written.
    pub fn plan_path(&self) -> PathBuf {
        self.output_video.with_extension("plan.json")
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), String> {
        if self.chapter == 0 {
            return Err("chapter must be at least 1".to_string());
        }

        if self.start_verse == 0 {
            return Err("start_verse must be at least 1".to_string());
        }

        if self.end_verse < self.start_verse {
            return Err("end_verse must not precede start_verse".to_string());
        }

        if self.verse_table.as_os_str().is_empty() {
            return Err("verse_table path is required".to_string());
        }

        if self.clips_dir.as_os_str().is_empty() {
            return Err("clips_dir path is required".to_string());
        }

        if self.output_video.file_name().is_none() {
            return Err("output_video must name a file".to_string());
        }

        if let (Some(start), Some(end)) = (self.start_row, self.end_row) {
            if end < start {
                return Err("end_row must not precede start_row".to_string());
            }
        }

        if let Some(translation) = &self.translation {
            if translation.id.is_empty() {
                return Err("translation id must be specified".to_string());
            }
            if translation.column.is_empty() {
                return Err("translation column must be specified".to_string());
            }
        }

        if self.columns.verse_number.is_empty()
            || self.columns.verse_text.is_empty()
            || self.columns.timestamp.is_empty()
        {
            return Err("column titles must not be blank".to_string());
        }

        self.settings.validate()
    }

    /// A minimal request for the given table, pool, and output paths.
    pub fn new(
        chapter: u32,
        start_verse: u32,
        end_verse: u32,
        verse_table: impl Into<PathBuf>,
        clips_dir: impl Into<PathBuf>,
        output_video: impl Into<PathBuf>,
    ) -> Self {
        Self {
            chapter,
            start_verse,
            end_verse,
            marker_export: None,
            verse_table: verse_table.into(),
            clips_dir: clips_dir.into(),
            audio_file: None,
            output_video: output_video.into(),
            translation: None,
            replay_map: None,
            start_row: None,
            end_row: None,
            columns: TableColumns::default(),
            settings: VideoSettings::default(),
            time_modifiers: TimeModifiers::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RunRequest {
        RunRequest::new(2, 255, 257, "tables/baqarah.tsv", "clips", "out/video.mp4")
    }

    #[test]
    fn test_request_validation() {
        assert!(request().validate().is_ok());

        let bad_range = RunRequest {
            end_verse: 200,
            ..request()
        };
        assert!(bad_range.validate().is_err());

        let bad_rows = RunRequest {
            start_row: Some(5),
            end_row: Some(2),
            ..request()
        };
        assert!(bad_rows.validate().is_err());

        let blank_translation = RunRequest {
            translation: Some(TranslationSettings {
                id: String::new(),
                column: "English".to_string(),
            }),
            ..request()
        };
        assert!(blank_translation.validate().is_err());
    }

    #[test]
    fn test_verse_labels() {
        let request = request();
        assert_eq!(request.start_label(), "2:255");
        assert_eq!(request.end_label(), "2:257");
    }

    #[test]
    fn test_sibling_document_paths() {
        let request = request();
        assert_eq!(request.map_path(), PathBuf::from("out/video.json"));
        assert_eq!(request.plan_path(), PathBuf::from("out/video.plan.json"));
    }
}
