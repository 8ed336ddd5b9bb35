//! Covers each verse window with background clip segments.
//!
//! Allocation per verse loops through selecting, validating, and
//! accept/reject rounds until the covered duration reaches the target:
//!
//! ```text
//! SELECTING ──▶ VALIDATING ──▶ ACCEPTED ──▶ (covered >= target) ──▶ DONE
//!     ▲                            │
//!     └──────── REJECTED ◀────────┘
//! ```
//!
//! A candidate segment is rejected when accepting it would leave a gap
//! shorter than the minimum segment duration but still greater than
//! zero. Accepted segments are never revisited.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::debug;
use versecut_models::{CandidateClip, ClipSegment, VerseAllocation, VideoSettings};

use crate::decision::DecisionProvider;
use crate::error::{EngineError, EngineResult};

/// Rejected rounds tolerated before a verse is declared uncoverable.
const MAX_REJECTED_ROUNDS: usize = 256;

/// Allocates background segments for one run, verse by verse.
///
/// The set of used clip paths is shared across verses of the run, so
/// allocation order matters and runs single-threaded.
pub struct ClipAllocator<'a> {
    pool: &'a [CandidateClip],
    settings: &'a VideoSettings,
    used_paths: HashSet<PathBuf>,
}

impl<'a> ClipAllocator<'a> {
    pub fn new(pool: &'a [CandidateClip], settings: &'a VideoSettings) -> Self {
        Self {
            pool,
            settings,
            used_paths: HashSet::new(),
        }
    }

    /// Produce segments whose adjusted durations sum to at least
    /// `target_duration` seconds.
    pub fn allocate(
        &mut self,
        verse_index: u32,
        target_duration: f64,
        decisions: &mut dyn DecisionProvider,
    ) -> EngineResult<VerseAllocation> {
        if self.pool.is_empty() {
            return Err(EngineError::InsufficientFootage {
                verse_index,
                required: target_duration,
            });
        }

        let mut segments = VerseAllocation::new();
        let mut covered = 0.0_f64;
        let mut rejected_rounds = 0_usize;

        while covered < target_duration {
            if rejected_rounds >= MAX_REJECTED_ROUNDS {
                return Err(EngineError::InsufficientFootage {
                    verse_index,
                    required: target_duration - covered,
                });
            }

            let eligible = self.eligible_indices();
            let clip_index = decisions.pick_clip(verse_index, self.pool, &eligible);
            let (segment, adjusted) = self.build_segment(verse_index, clip_index, decisions)?;

            let remaining = target_duration - covered;
            let leftover = remaining - adjusted;
            if leftover >= self.settings.min_clip_duration || leftover <= 0.0 {
                debug!(
                    verse_index,
                    path = %segment.path,
                    adjusted,
                    covered = covered + adjusted,
                    "accepted segment"
                );
                self.used_paths.insert(self.pool[clip_index].path.clone());
                covered += adjusted;
                segments.push(segment);
                rejected_rounds = 0;
            } else {
                debug!(
                    verse_index,
                    adjusted, remaining, "rejected segment, remainder would fall below minimum"
                );
                rejected_rounds += 1;
            }
        }

        Ok(segments)
    }

    /// Pick one clip and one still frame for an image-mode verse.
    pub fn allocate_still(
        &mut self,
        verse_index: u32,
        target_duration: f64,
        decisions: &mut dyn DecisionProvider,
    ) -> EngineResult<(VerseAllocation, u64)> {
        if self.pool.is_empty() {
            return Err(EngineError::InsufficientFootage {
                verse_index,
                required: target_duration,
            });
        }

        let eligible = self.eligible_indices();
        let clip_index = decisions.pick_clip(verse_index, self.pool, &eligible);
        let (segment, _) = self.build_segment(verse_index, clip_index, decisions)?;
        let frame = decisions.frame_index(verse_index, self.pool[clip_index].frame_count);
        self.used_paths.insert(self.pool[clip_index].path.clone());
        debug!(verse_index, path = %segment.path, frame, "picked still frame");

        Ok((vec![segment], frame))
    }

    /// Pool indices allowed for the next pick. When duplicates are off
    /// and every clip has been used, the whole pool becomes eligible
    /// again.
    fn eligible_indices(&self) -> Vec<usize> {
        if !self.settings.allow_duplicate_clips {
            let unused: Vec<usize> = self
                .pool
                .iter()
                .enumerate()
                .filter(|(_, clip)| !self.used_paths.contains(&clip.path))
                .map(|(index, _)| index)
                .collect();
            if !unused.is_empty() {
                return unused;
            }
        }
        (0..self.pool.len()).collect()
    }

    fn build_segment(
        &self,
        verse_index: u32,
        clip_index: usize,
        decisions: &mut dyn DecisionProvider,
    ) -> EngineResult<(ClipSegment, f64)> {
        let clip = &self.pool[clip_index];
        let effective = clip.effective_duration(self.settings.speed);

        let max_time_offset = (effective - self.settings.min_clip_duration).max(0.0);
        let time_offset = decisions.time_offset(verse_index, max_time_offset);

        if clip.width < self.settings.video_width {
            return Err(EngineError::ClipTooNarrow {
                verse_index,
                path: clip.path.to_string_lossy().into_owned(),
                clip_width: clip.width,
                video_width: self.settings.video_width,
            });
        }
        let max_horizontal = clip.width - self.settings.video_width;
        let horizontal_offset = decisions.horizontal_offset(verse_index, max_horizontal);

        let mirrored = decisions.mirrored(verse_index, self.settings.allow_mirrored_clips);

        let segment = ClipSegment {
            path: clip.path.to_string_lossy().into_owned(),
            time_offset,
            horizontal_offset,
            mirrored,
        };
        Ok((segment, effective - time_offset))
    }
}
