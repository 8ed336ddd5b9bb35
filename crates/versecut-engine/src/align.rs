//! Assigns verse labels to table rows by fuzzy-matching row text
//! against canonical verse text.
//!
//! Row text from marker tooling is character-noisy and often truncated,
//! so candidate verses are scored with a normalized edit-similarity
//! ratio over windows starting at word boundaries. Matching is greedy
//! over rows in table order.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, warn};
use versecut_models::VerseRow;

/// Matches below this similarity leave the row blank for operator review.
const ASSIGNMENT_THRESHOLD: f64 = 90.0;

/// One canonical verse of the target range.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalVerse {
    /// Verse label, e.g. `"2:255"`.
    pub number: String,
    pub text: String,
}

impl CanonicalVerse {
    pub fn new(number: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            text: text.into(),
        }
    }
}

/// Outcome of one alignment pass.
#[derive(Debug, Clone, Default)]
pub struct AlignReport {
    /// Rows that received a verse label in this pass.
    pub assigned: usize,
    /// Indices of processed rows left without a label.
    pub unresolved: Vec<usize>,
}

impl AlignReport {
    pub fn all_resolved(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Assign verse labels to every row whose text is non-empty or whose
/// timing cell is blank. Rows that already carry a label are never
/// reassigned, and no label is assigned twice.
pub fn align_rows(rows: &mut [VerseRow], verses: &[CanonicalVerse]) -> AlignReport {
    let mut remaining: VecDeque<usize> = (0..verses.len()).collect();
    let mut used: HashSet<String> = rows
        .iter()
        .filter(|row| !row.is_continuation())
        .map(|row| row.verse_number.clone())
        .collect();

    let mut report = AlignReport::default();

    for (row_index, row) in rows.iter_mut().enumerate() {
        if !row.is_continuation() {
            continue;
        }
        if row.verse_text.is_empty() && !row.timestamp.is_empty() {
            continue;
        }

        let mut best_score = 0.0_f64;
        let mut best: Option<usize> = None;
        for &candidate in &remaining {
            let verse = &verses[candidate];
            if verse.text.chars().count() < row.verse_text.chars().count() {
                continue;
            }
            let score = best_window_score(&row.verse_text, &verse.text);
            if score > best_score {
                best_score = score;
                best = Some(candidate);
            }
            if best_score >= 100.0 {
                break;
            }
        }

        match best {
            Some(candidate) if best_score >= ASSIGNMENT_THRESHOLD => {
                let number = verses[candidate].number.clone();
                if used.contains(&number) {
                    warn!(
                        row = row_index,
                        verse = %number,
                        "best match already assigned, leaving row blank"
                    );
                    report.unresolved.push(row_index);
                } else {
                    debug!(row = row_index, verse = %number, score = best_score, "assigned verse");
                    row.verse_number = number.clone();
                    used.insert(number);
                    report.assigned += 1;
                    // Drop a stale leading candidate so later rows stop
                    // rematching against it.
                    if remaining.front().is_some_and(|front| *front != candidate) {
                        remaining.pop_front();
                    }
                }
            }
            _ => {
                warn!(
                    row = row_index,
                    score = best_score,
                    "no confident verse match, leaving row blank"
                );
                report.unresolved.push(row_index);
            }
        }
    }

    report
}

/// Best similarity between the row text and every window of the
/// candidate text starting at a word boundary. A perfect window stops
/// the search early.
fn best_window_score(row_text: &str, candidate_text: &str) -> f64 {
    let row_len = row_text.chars().count();
    let chars: Vec<char> = candidate_text.chars().collect();

    let mut starts = vec![0_usize];
    for (i, c) in chars.iter().enumerate() {
        if *c == ' ' && i + 1 < chars.len() {
            starts.push(i + 1);
        }
    }

    let mut best = 0.0_f64;
    for start in starts {
        let end = (start + row_len).min(chars.len());
        let window: String = chars[start..end].iter().collect();
        let score = strsim::normalized_levenshtein(row_text, &window) * 100.0;
        if score > best {
            best = score;
        }
        if score >= 100.0 {
            break;
        }
    }
    best
}
