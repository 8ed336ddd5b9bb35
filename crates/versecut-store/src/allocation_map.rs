//! Allocation map file helpers.
//!
//! The map records which background clips covered each verse index, one
//! segment tuple per line so a run can be hand-edited and replayed.

use std::path::Path;

use tracing::info;

use versecut_models::AllocationMap;

use crate::error::{StoreError, StoreResult};

/// Render a map as JSON with one segment tuple per line.
///
/// Verse indices key the object in ascending order. Tab indentation and a
/// trailing newline keep the file stable under repeated runs.
pub fn render_map(map: &AllocationMap) -> StoreResult<String> {
    let mut out = String::from("{");
    let mut first = true;

    for (verse_index, segments) in map.iter() {
        if !first {
            out.push(',');
        }
        first = false;

        out.push_str("\n\t\"");
        out.push_str(&verse_index.to_string());
        out.push_str("\": ");

        if segments.is_empty() {
            out.push_str("[]");
        } else {
            out.push('[');
            for (position, segment) in segments.iter().enumerate() {
                if position > 0 {
                    out.push(',');
                }
                out.push_str("\n\t\t");
                out.push_str(&serde_json::to_string(segment)?);
            }
            out.push_str("\n\t]");
        }
    }

    if !first {
        out.push('\n');
    }
    out.push_str("}\n");
    Ok(out)
}

/// Parse a map from JSON text.
pub fn parse_map(text: &str, path: &Path) -> StoreResult<AllocationMap> {
    serde_json::from_str(text).map_err(|e| StoreError::malformed_map(path, e.to_string()))
}

pub async fn load_map(path: &Path) -> StoreResult<AllocationMap> {
    let text = tokio::fs::read_to_string(path).await?;
    let map = parse_map(&text, path)?;
    info!(path = %path.display(), verses = map.len(), "Loaded allocation map");
    Ok(map)
}

pub async fn save_map(path: &Path, map: &AllocationMap) -> StoreResult<()> {
    let text = render_map(map)?;
    tokio::fs::write(path, text).await?;
    info!(path = %path.display(), verses = map.len(), "Saved allocation map");
    Ok(())
}
