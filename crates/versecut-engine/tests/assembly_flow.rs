//! End-to-end tests for the assembly core: markers through alignment,
//! allocation, recording, and replay.

use std::collections::VecDeque;
use std::path::PathBuf;

use versecut_engine::{
    align_rows, reconcile_markers, AllocationRecorder, CanonicalVerse, ClipAllocator,
    DecisionProvider, RandomDecisions, ReplayDecisions,
};
use versecut_models::{
    time_difference, AllocationMap, CandidateClip, ClipSegment, VerseRow, VideoSettings,
};

fn clip(path: &str, duration: f64) -> CandidateClip {
    CandidateClip {
        path: PathBuf::from(path),
        total_duration: duration,
        width: 1920,
        height: 1080,
        frame_count: (duration * 30.0) as u64,
    }
}

fn pool() -> Vec<CandidateClip> {
    vec![
        clip("clips/ocean.mp4", 20.0),
        clip("clips/forest.mp4", 18.0),
        clip("clips/dunes.mp4", 25.0),
    ]
}

fn settings() -> VideoSettings {
    VideoSettings {
        min_clip_duration: 2.0,
        ..VideoSettings::default()
    }
}

/// Scripted decisions for reproducible allocation in tests.
#[derive(Default)]
struct Scripted {
    picks: VecDeque<usize>,
    trims: VecDeque<f64>,
    offsets: VecDeque<u32>,
    mirrors: VecDeque<bool>,
}

impl DecisionProvider for Scripted {
    fn pick_clip(&mut self, _verse_index: u32, _pool: &[CandidateClip], eligible: &[usize]) -> usize {
        self.picks
            .pop_front()
            .unwrap_or_else(|| eligible.first().copied().unwrap_or(0))
    }

    fn time_offset(&mut self, _verse_index: u32, _max_offset: f64) -> f64 {
        self.trims.pop_front().unwrap_or(0.0)
    }

    fn horizontal_offset(&mut self, _verse_index: u32, _max_offset: u32) -> u32 {
        self.offsets.pop_front().unwrap_or(0)
    }

    fn mirrored(&mut self, _verse_index: u32, allow_mirrored: bool) -> bool {
        allow_mirrored && self.mirrors.pop_front().unwrap_or(false)
    }

    fn frame_index(&mut self, _verse_index: u32, _frame_count: u64) -> u64 {
        1
    }
}

fn marker_export() -> String {
    let lines = [
        "Name\tStart\tDuration\tTime Format\tType\tDescription",
        "Marker 01\t00:08.000\t00:00.000\tdecimal\tCue\t",
        "Marker 02\t00:00.500\t00:00.000\tdecimal\tCue\t",
        "Marker 03\t00:14.200\t00:00.000\tdecimal\tSubclip\t",
        "Marker 04\t00:16.000\t00:00.000\tdecimal\tCue\t",
        "Marker 05\t00:24.000\t00:00.000\tdecimal\tCue\t",
    ];
    format!("{}\n", lines.join("\n"))
}

/// Reconcile markers, align verses, then allocate every window and
/// check the recorded map matches what was allocated.
#[test]
fn test_markers_to_recorded_allocations() {
    let boundaries = reconcile_markers(&marker_export()).unwrap();
    assert_eq!(boundaries.len(), 4);

    // Pair with transcription rows in boundary order.
    let texts = [
        "say he is god the one",
        "god the eternal refuge",
        "he neither begets nor is born",
        "",
    ];
    let mut rows: Vec<VerseRow> = boundaries
        .iter()
        .zip(texts.iter())
        .map(|(boundary, text)| {
            let mut row = VerseRow {
                verse_text: text.to_string(),
                ..VerseRow::default()
            };
            row.set_timing(boundary);
            row
        })
        .collect();

    let verses = vec![
        CanonicalVerse::new("112:1", "say he is god the one"),
        CanonicalVerse::new("112:2", "god the eternal refuge"),
        CanonicalVerse::new("112:3", "he neither begets nor is born"),
        CanonicalVerse::new("112:4", "nor is there to him any equivalent"),
    ];
    let report = align_rows(&mut rows, &verses);
    assert_eq!(report.assigned, 3);
    assert_eq!(
        rows.iter().map(|r| r.verse_number.as_str()).collect::<Vec<_>>(),
        vec!["112:1", "112:2", "112:3", ""]
    );

    // Allocate each window between consecutive boundaries.
    let pool = pool();
    let settings = settings();
    let mut allocator = ClipAllocator::new(&pool, &settings);
    let mut decisions = RandomDecisions::new();
    let mut recorder = AllocationRecorder::new();

    let mut allocations: Vec<Vec<ClipSegment>> = Vec::new();
    for (index, window) in rows.windows(2).enumerate() {
        let start = window[0].timing().unwrap();
        let end = window[1].timing().unwrap();
        let duration =
            time_difference(start.start(), end.start()).unwrap();
        let verse_index = index as u32 + 1;

        let segments = allocator
            .allocate(verse_index, duration, &mut decisions)
            .unwrap();
        let covered: f64 = segments
            .iter()
            .map(|segment| {
                let clip = pool
                    .iter()
                    .find(|c| c.path.to_string_lossy() == segment.path)
                    .unwrap();
                clip.effective_duration(settings.speed) - segment.time_offset
            })
            .sum();
        assert!(covered + 1e-9 >= duration);

        recorder.record(verse_index, &segments);
        allocations.push(segments);
    }

    let map = recorder.into_map();
    assert_eq!(map.len(), 3);
    for (index, segments) in allocations.iter().enumerate() {
        let entry = map.get(index as u32 + 1).unwrap();
        assert_eq!(entry.len(), segments.len());
        for (recorded, segment) in entry.iter().zip(segments.iter()) {
            assert_eq!(recorded.path, segment.path);
            assert_eq!(recorded.time_offset, segment.time_offset);
        }
    }
}

/// Replaying a valid map twice yields identical segment lists both
/// times, no matter what the random source would have chosen.
#[test]
fn test_replay_is_deterministic() {
    let pool = pool();
    let settings = settings();

    // First run, scripted for a known multi-segment allocation.
    let mut allocator = ClipAllocator::new(&pool, &settings);
    let mut decisions = Scripted {
        picks: VecDeque::from([1, 2]),
        trims: VecDeque::from([10.0, 16.5]),
        offsets: VecDeque::from([300, 44]),
        mirrors: VecDeque::from([true, false]),
        ..Scripted::default()
    };
    let original = allocator.allocate(1, 12.0, &mut decisions).unwrap();
    assert_eq!(original.len(), 2);

    let mut recorder = AllocationRecorder::new();
    recorder.record(1, &original);
    let map = recorder.into_map();

    let mut replays = Vec::new();
    for _ in 0..2 {
        let mut allocator = ClipAllocator::new(&pool, &settings);
        let mut decisions = ReplayDecisions::new(map.clone());
        replays.push(allocator.allocate(1, 12.0, &mut decisions).unwrap());
    }

    assert_eq!(replays[0], original);
    assert_eq!(replays[1], original);
}

/// A replayed map survives serialization: reload and replay still
/// reproduce the original allocation.
#[test]
fn test_map_roundtrip_preserves_replay() {
    let pool = pool();
    let settings = settings();

    let mut allocator = ClipAllocator::new(&pool, &settings);
    let mut decisions = Scripted {
        picks: VecDeque::from([0]),
        trims: VecDeque::from([4.25]),
        offsets: VecDeque::from([128]),
        mirrors: VecDeque::from([true]),
        ..Scripted::default()
    };
    let original = allocator.allocate(4, 9.0, &mut decisions).unwrap();

    let mut recorder = AllocationRecorder::new();
    recorder.record(4, &original);
    let map = recorder.into_map();

    let json = serde_json::to_string(&map).unwrap();
    let reloaded: AllocationMap = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, map);

    let mut allocator = ClipAllocator::new(&pool, &settings);
    let mut decisions = ReplayDecisions::new(reloaded);
    let replayed = allocator.allocate(4, 9.0, &mut decisions).unwrap();
    assert_eq!(replayed, original);
}
