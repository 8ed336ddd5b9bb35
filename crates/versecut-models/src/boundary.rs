//! Timing boundaries produced by marker reconciliation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::timestamp::{parse_timestamp, TimestampError};

/// One reconciled marker entry: a single cut point, or a subclip pair.
///
/// A pair is stored `[later, earlier]`; the first element is the subclip's
/// end reference and is what the boundary sorts and serializes by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum TimingBoundary {
    /// A single cut point.
    Single(String),
    /// A subclip pair, later time first.
    Pair(String, String),
}

impl TimingBoundary {
    /// Elapsed seconds used for ordering. Pairs order by their first element.
    pub fn elapsed_seconds(&self) -> Result<f64, TimestampError> {
        match self {
            Self::Single(ts) => parse_timestamp(ts),
            Self::Pair(later, _) => parse_timestamp(later),
        }
    }

    /// The time the boundary starts at (first element of a pair).
    pub fn start(&self) -> &str {
        match self {
            Self::Single(ts) => ts,
            Self::Pair(later, _) => later,
        }
    }

    /// The mid-verse text cut of a subclip pair, if any.
    pub fn text_cut(&self) -> Option<&str> {
        match self {
            Self::Single(_) => None,
            Self::Pair(_, earlier) => Some(earlier),
        }
    }

    /// Reorder a pair so its later-occurring member comes first.
    pub fn into_sorted(self) -> Result<Self, TimestampError> {
        match self {
            Self::Single(_) => Ok(self),
            Self::Pair(a, b) => {
                if parse_timestamp(&a)? >= parse_timestamp(&b)? {
                    Ok(Self::Pair(a, b))
                } else {
                    Ok(Self::Pair(b, a))
                }
            }
        }
    }

    /// Serialize for a verse-table timestamp cell: pairs are comma-joined.
    pub fn to_cell(&self) -> String {
        match self {
            Self::Single(ts) => ts.clone(),
            Self::Pair(later, earlier) => format!("{},{}", later, earlier),
        }
    }

    /// Parse a verse-table timestamp cell.
    pub fn from_cell(cell: &str) -> Self {
        match cell.trim().split_once(',') {
            Some((later, earlier)) => {
                Self::Pair(later.trim().to_string(), earlier.trim().to_string())
            }
            None => Self::Single(cell.trim().to_string()),
        }
    }
}
