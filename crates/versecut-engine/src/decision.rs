//! Pluggable source of allocation decisions.
//!
//! Every random choice the allocator makes goes through a
//! [`DecisionProvider`]: the clip pick, the time trim, the horizontal
//! crop offset, the mirror flag, and the image-mode frame pick. One
//! implementation draws uniformly at random, the other replays a
//! recorded allocation map and falls back to random for anything the
//! map does not cover or fails to validate.

use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

use rand::prelude::IndexedRandom;
use rand::rngs::ThreadRng;
use rand::Rng;
use tracing::warn;
use versecut_models::{AllocationMap, CandidateClip, RecordedSegment};

/// Supplies one decision per random choice in an allocation attempt.
///
/// `pick_clip` opens an attempt; the offset and mirror queries that
/// follow belong to that attempt. `eligible` holds the pool indices that
/// satisfy the duplication policy and is never empty; implementations
/// may still return any pool index (a replayed pick is allowed to reuse
/// a clip the policy would skip).
pub trait DecisionProvider {
    fn pick_clip(&mut self, verse_index: u32, pool: &[CandidateClip], eligible: &[usize]) -> usize;

    /// Trim from the start of the clip, in `[0, max_offset]` seconds.
    fn time_offset(&mut self, verse_index: u32, max_offset: f64) -> f64;

    /// Horizontal crop offset, in `[0, max_offset]` pixels.
    fn horizontal_offset(&mut self, verse_index: u32, max_offset: u32) -> u32;

    fn mirrored(&mut self, verse_index: u32, allow_mirrored: bool) -> bool;

    /// 1-based still frame pick for image mode.
    fn frame_index(&mut self, verse_index: u32, frame_count: u64) -> u64;
}

/// Draws every decision uniformly at random.
pub struct RandomDecisions {
    rng: ThreadRng,
}

impl RandomDecisions {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for RandomDecisions {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionProvider for RandomDecisions {
    fn pick_clip(&mut self, _verse_index: u32, _pool: &[CandidateClip], eligible: &[usize]) -> usize {
        // The allocator never passes an empty eligible set.
        eligible.choose(&mut self.rng).copied().unwrap_or(0)
    }

    fn time_offset(&mut self, _verse_index: u32, max_offset: f64) -> f64 {
        if max_offset <= 0.0 {
            return 0.0;
        }
        round_to_hundredths(self.rng.random_range(0.0..=max_offset))
    }

    fn horizontal_offset(&mut self, _verse_index: u32, max_offset: u32) -> u32 {
        self.rng.random_range(0..=max_offset)
    }

    fn mirrored(&mut self, _verse_index: u32, allow_mirrored: bool) -> bool {
        allow_mirrored && self.rng.random_bool(0.5)
    }

    fn frame_index(&mut self, _verse_index: u32, frame_count: u64) -> u64 {
        self.rng.random_range(1..=frame_count.max(1))
    }
}

#[derive(Default)]
struct PendingFields {
    time_offset: Option<f64>,
    horizontal_offset: Option<i64>,
    mirrored: Option<String>,
}

/// Replays a recorded allocation map, validating each field.
///
/// Each `pick_clip` call consumes one recorded entry for the verse, so a
/// rejected attempt never replays the same entry twice. A field that
/// fails validation is logged and regenerated at random; allocation
/// still completes.
pub struct ReplayDecisions {
    queues: BTreeMap<u32, VecDeque<RecordedSegment>>,
    pending: PendingFields,
    fallback: RandomDecisions,
}

impl ReplayDecisions {
    pub fn new(map: AllocationMap) -> Self {
        let queues = map
            .iter()
            .map(|(index, segments)| (index, VecDeque::from(segments.to_vec())))
            .collect();
        Self {
            queues,
            pending: PendingFields::default(),
            fallback: RandomDecisions::new(),
        }
    }
}

impl DecisionProvider for ReplayDecisions {
    fn pick_clip(&mut self, verse_index: u32, pool: &[CandidateClip], eligible: &[usize]) -> usize {
        self.pending = PendingFields::default();
        if let Some(entry) = self
            .queues
            .get_mut(&verse_index)
            .and_then(VecDeque::pop_front)
        {
            self.pending = PendingFields {
                time_offset: Some(entry.time_offset),
                horizontal_offset: Some(entry.horizontal_offset),
                mirrored: Some(entry.mirrored.clone()),
            };
            if let Some(index) = pool
                .iter()
                .position(|clip| clip.path.as_path() == Path::new(&entry.path))
            {
                return index;
            }
            warn!(verse_index, path = %entry.path, "recorded clip not in pool, picking at random");
        }
        self.fallback.pick_clip(verse_index, pool, eligible)
    }

    fn time_offset(&mut self, verse_index: u32, max_offset: f64) -> f64 {
        if let Some(recorded) = self.pending.time_offset.take() {
            if (0.0..=max_offset).contains(&recorded) {
                return recorded;
            }
            warn!(
                verse_index,
                recorded, max_offset, "recorded time offset out of range, regenerating"
            );
        }
        self.fallback.time_offset(verse_index, max_offset)
    }

    fn horizontal_offset(&mut self, verse_index: u32, max_offset: u32) -> u32 {
        if let Some(recorded) = self.pending.horizontal_offset.take() {
            if recorded >= 0 && recorded <= i64::from(max_offset) {
                return recorded as u32;
            }
            warn!(
                verse_index,
                recorded, max_offset, "recorded horizontal offset out of range, regenerating"
            );
        }
        self.fallback.horizontal_offset(verse_index, max_offset)
    }

    fn mirrored(&mut self, verse_index: u32, allow_mirrored: bool) -> bool {
        if let Some(recorded) = self.pending.mirrored.take() {
            match recorded.as_str() {
                "True" => return true,
                "False" => return false,
                other => warn!(
                    verse_index,
                    recorded = other,
                    "recorded mirror flag is not boolean-like, regenerating"
                ),
            }
        }
        self.fallback.mirrored(verse_index, allow_mirrored)
    }

    fn frame_index(&mut self, verse_index: u32, frame_count: u64) -> u64 {
        // Frame picks are never recorded.
        self.fallback.frame_index(verse_index, frame_count)
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
