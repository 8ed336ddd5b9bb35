//! Records final allocations for persistence and replay.

use versecut_models::{AllocationMap, ClipSegment, RecordedSegment};

/// Accumulates the allocation of every processed verse index.
///
/// The resulting map is what a later run feeds into
/// [`crate::decision::ReplayDecisions`] to reproduce these choices.
#[derive(Debug, Default)]
pub struct AllocationRecorder {
    map: AllocationMap,
}

impl AllocationRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the final segments for a verse index, replacing any prior
    /// entry for that index.
    pub fn record(&mut self, verse_index: u32, segments: &[ClipSegment]) {
        let recorded: Vec<RecordedSegment> = segments
            .iter()
            .cloned()
            .map(RecordedSegment::from)
            .collect();
        self.map.insert(verse_index, recorded);
    }

    pub fn recorded(&self) -> &AllocationMap {
        &self.map
    }

    pub fn into_map(self) -> AllocationMap {
        self.map
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(path: &str, mirrored: bool) -> ClipSegment {
        ClipSegment {
            path: path.to_string(),
            time_offset: 2.5,
            horizontal_offset: 12,
            mirrored,
        }
    }

    #[test]
    fn test_record_converts_segments() {
        let mut recorder = AllocationRecorder::new();
        recorder.record(1, &[segment("clips/a.mp4", true), segment("clips/b.mp4", false)]);

        let entry = recorder.recorded().get(1).unwrap();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry[0].path, "clips/a.mp4");
        assert_eq!(entry[0].mirrored, "True");
        assert_eq!(entry[1].mirrored, "False");
    }

    #[test]
    fn test_record_replaces_prior_entry() {
        let mut recorder = AllocationRecorder::new();
        recorder.record(1, &[segment("clips/a.mp4", false)]);
        recorder.record(1, &[segment("clips/b.mp4", false)]);

        assert_eq!(recorder.len(), 1);
        let entry = recorder.recorded().get(1).unwrap();
        assert_eq!(entry[0].path, "clips/b.mp4");
    }

    #[test]
    fn test_into_map_keeps_entries() {
        let mut recorder = AllocationRecorder::new();
        recorder.record(2, &[segment("clips/a.mp4", false)]);
        recorder.record(1, &[]);

        let map = recorder.into_map();
        assert_eq!(map.len(), 2);
        assert!(map.contains(1));
        assert!(map.contains(2));
    }
}
