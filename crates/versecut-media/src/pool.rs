//! Discovers candidate clips in a footage directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use versecut_models::CandidateClip;

use crate::error::{MediaError, MediaResult};
use crate::probe::probe_candidate;

/// File extension accepted into the pool.
const CLIP_EXTENSION: &str = "mp4";

/// Collect clip paths under `dir` recursively, sorted by path.
pub fn collect_clip_paths(dir: impl AsRef<Path>) -> MediaResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(MediaError::FileNotFound(dir.to_path_buf()));
    }

    let mut paths = Vec::new();
    collect_into(dir, &mut paths)?;
    paths.sort();
    Ok(paths)
}

fn collect_into(dir: &Path, paths: &mut Vec<PathBuf>) -> MediaResult<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_into(&path, paths)?;
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(CLIP_EXTENSION))
        {
            paths.push(path);
        }
    }
    Ok(())
}

/// Probe every discovered clip into a candidate pool.
pub async fn scan_pool(dir: impl AsRef<Path>) -> MediaResult<Vec<CandidateClip>> {
    let dir = dir.as_ref();
    let paths = collect_clip_paths(dir)?;
    if paths.is_empty() {
        warn!(dir = %dir.display(), "no clips found in footage directory");
    }

    let mut pool = Vec::with_capacity(paths.len());
    for path in paths {
        let candidate = probe_candidate(&path).await?;
        debug!(
            path = %candidate.path.display(),
            duration = candidate.total_duration,
            width = candidate.width,
            "probed clip"
        );
        pool.push(candidate);
    }

    info!(dir = %dir.display(), clips = pool.len(), "scanned footage pool");
    Ok(pool)
}
