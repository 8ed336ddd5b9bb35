//! Rows of the tab-delimited verse table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::boundary::TimingBoundary;

/// Column titles that locate well-known fields in a verse table.
///
/// Tables produced by different authoring tools title the same fields
/// differently, so the titles are configurable per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TableColumns {
    pub verse_number: String,
    pub verse_text: String,
    pub timestamp: String,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            verse_number: "verse_number".to_string(),
            verse_text: "verse_text".to_string(),
            timestamp: "timestamp".to_string(),
        }
    }
}

/// One row of the verse table.
///
/// Cells are carried verbatim; an empty string is a blank cell. A blank
/// `verse_number` marks a continuation row that extends the previous verse,
/// and a blank `timestamp` marks a row the reconciler has not filled yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VerseRow {
    /// Verse label, e.g. `"2:255"`.
    pub verse_number: String,
    /// Transcribed verse text for this row.
    pub verse_text: String,
    /// Translation cell, present only when the table has a translation column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_translation: Option<String>,
    /// Timing cell, either one timestamp or a comma-joined pair.
    pub timestamp: String,
}

impl VerseRow {
    /// Parse the timing cell, or `None` when it is blank.
    pub fn timing(&self) -> Option<TimingBoundary> {
        if self.timestamp.trim().is_empty() {
            None
        } else {
            Some(TimingBoundary::from_cell(&self.timestamp))
        }
    }

    /// Overwrite the timing cell from a boundary.
    pub fn set_timing(&mut self, boundary: &TimingBoundary) {
        self.timestamp = boundary.to_cell();
    }

    /// Whether this row extends the previous verse rather than starting one.
    pub fn is_continuation(&self) -> bool {
        self.verse_number.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_blank_cell_is_none() {
        let row = VerseRow {
            timestamp: "  ".to_string(),
            ..VerseRow::default()
        };
        assert_eq!(row.timing(), None);
    }

    #[test]
    fn test_timing_parses_pair_cell() {
        let row = VerseRow {
            timestamp: "00:12.500,00:10.000".to_string(),
            ..VerseRow::default()
        };
        assert_eq!(
            row.timing(),
            Some(TimingBoundary::Pair(
                "00:12.500".to_string(),
                "00:10.000".to_string()
            ))
        );
    }

    #[test]
    fn test_set_timing_writes_cell() {
        let mut row = VerseRow::default();
        row.set_timing(&TimingBoundary::Single("01:02.003".to_string()));
        assert_eq!(row.timestamp, "01:02.003");

        row.set_timing(&TimingBoundary::Pair(
            "00:12.500".to_string(),
            "00:10.000".to_string(),
        ));
        assert_eq!(row.timestamp, "00:12.500,00:10.000");
    }

    #[test]
    fn test_continuation_rows_have_blank_numbers() {
        let numbered = VerseRow {
            verse_number: "2:255".to_string(),
            ..VerseRow::default()
        };
        let continuation = VerseRow::default();
        assert!(!numbered.is_continuation());
        assert!(continuation.is_continuation());
    }

    #[test]
    fn test_table_columns_deserialize_partial_override() {
        let columns: TableColumns =
            serde_json::from_str(r#"{"verse_text": "ar"}"#).unwrap();
        assert_eq!(columns.verse_text, "ar");
        assert_eq!(columns.timestamp, "timestamp");
    }
}
