//! Reconciles a raw marker export into ordered timing boundaries.
//!
//! Marker exports are tab-delimited with a header line. Each data line
//! carries a time field and a marker-type field at fixed positions. A
//! `Subclip` marker pairs with the line that follows it to form a
//! two-point range.

use std::cmp::Ordering;

use versecut_models::TimingBoundary;

use crate::error::{EngineError, EngineResult};

/// Marker type that pairs with the following line.
const SUBCLIP_TYPE: &str = "Subclip";

/// Positional field carrying the marker time.
const TIME_FIELD: usize = 1;

/// Positional field carrying the marker type.
const TYPE_FIELD: usize = 4;

const MIN_FIELDS: usize = 5;

struct MarkerLine {
    time: String,
    kind: String,
}

impl MarkerLine {
    fn parse(line_number: usize, line: &str) -> EngineResult<Self> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(EngineError::malformed_marker(
                line_number,
                format!(
                    "expected at least {MIN_FIELDS} tab-separated fields, found {}",
                    fields.len()
                ),
            ));
        }
        Ok(Self {
            time: fields[TIME_FIELD].trim().to_string(),
            kind: fields[TYPE_FIELD].trim().to_string(),
        })
    }
}

/// Parse a marker export into timing boundaries sorted by elapsed seconds.
///
/// Subclip pairs keep their later member first. The final sequence is
/// stably sorted ascending, a pair sorting by its later member.
pub fn reconcile_markers(input: &str) -> EngineResult<Vec<TimingBoundary>> {
    let mut raw = Vec::new();
    let mut lines = input
        .lines()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty());

    while let Some((index, line)) = lines.next() {
        let marker = MarkerLine::parse(index + 1, line)?;
        if marker.kind == SUBCLIP_TYPE {
            let Some((next_index, next_line)) = lines.next() else {
                return Err(EngineError::malformed_marker(
                    index + 1,
                    "subclip marker has no following line",
                ));
            };
            let next = MarkerLine::parse(next_index + 1, next_line)?;
            // File order is reversed: the following line becomes the
            // pair's first member.
            raw.push(TimingBoundary::Pair(next.time, marker.time));
        } else {
            raw.push(TimingBoundary::Single(marker.time));
        }
    }

    let mut keyed = Vec::with_capacity(raw.len());
    for boundary in raw {
        let boundary = boundary.into_sorted()?;
        let key = boundary.elapsed_seconds()?;
        keyed.push((key, boundary));
    }
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    Ok(keyed.into_iter().map(|(_, boundary)| boundary).collect())
}
