//! End-to-end assembly pipeline.
//!
//! A run turns a verse table, an editor marker export, and a directory of
//! background clips into two documents next to the output video: an
//! allocation map that makes the run replayable and a render plan
//! describing every verse window.

use tracing::info;

use versecut_engine::{
    align_rows, reconcile_markers, AllocationRecorder, CanonicalVerse, ClipAllocator,
    DecisionProvider, RandomDecisions, ReplayDecisions,
};
use versecut_media::scan_pool;
use versecut_models::{
    offset_timestamp, time_difference, CandidateClip, RenderPlan, RenderRow, RunRequest,
    TimingBoundary, VerseRow, VideoMode,
};
use versecut_store::{load_map, save_map, VerseTable};

use crate::canonical::CanonicalTextProvider;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::RunLogger;

/// Summary of a completed run.
#[derive(Debug)]
pub struct RunOutcome {
    pub run_id: String,
    pub verses: usize,
    pub segments: usize,
    pub total_duration: f64,
    /// Rows the aligner could not match to a canonical verse.
    pub unresolved_rows: usize,
}

/// Execute a full assembly run.
///
/// Scans the clip pool, then either replays the requested allocation map
/// or draws fresh random decisions.
pub async fn run(
    request: &RunRequest,
    provider: &dyn CanonicalTextProvider,
) -> WorkerResult<RunOutcome> {
    request.validate().map_err(WorkerError::InvalidRequest)?;

    let pool = scan_pool(&request.clips_dir).await?;

    let mut decisions: Box<dyn DecisionProvider> = match &request.replay_map {
        Some(path) => Box::new(ReplayDecisions::new(load_map(path).await?)),
        None => Box::new(RandomDecisions::new()),
    };

    run_with_pool(request, provider, &pool, decisions.as_mut()).await
}

/// Execute a run against an already scanned clip pool.
pub async fn run_with_pool(
    request: &RunRequest,
    provider: &dyn CanonicalTextProvider,
    pool: &[CandidateClip],
    decisions: &mut dyn DecisionProvider,
) -> WorkerResult<RunOutcome> {
    request.validate().map_err(WorkerError::InvalidRequest)?;

    let logger = RunLogger::new(request.chapter);
    logger.log_start(&format!(
        "Assembling {}-{} into {}",
        request.start_label(),
        request.end_label(),
        request.output_video.display()
    ));

    let mut table = load_or_seed_table(request, provider).await?;
    let mut unresolved_rows = 0;

    if let Some(translation) = &request.translation {
        let translations = chapter_slice(
            provider
                .chapter_translation(request.chapter, &translation.id)
                .await?,
            request,
        );
        table.write_translations(&translation.column, &translations);
        logger.log_progress(&format!("Filled translation column {}", translation.column));
    }

    if let Some(marker_export) = &request.marker_export {
        let markers = tokio::fs::read_to_string(marker_export).await?;
        let boundaries = reconcile_markers(&markers)?;
        table.write_timestamps(&boundaries);
        table.remove_empty_rows();
        logger.log_progress(&format!(
            "Reconciled {} timing boundaries into the table",
            boundaries.len()
        ));

        unresolved_rows = align_table_rows(&mut table, request, provider, &logger).await?;
    }

    table.save(&request.verse_table).await?;

    let translation_column = request.translation.as_ref().map(|t| t.column.as_str());
    let rows = table.verse_rows(translation_column)?;
    let (start_line, end_line) = table.loop_range(
        &request.start_label(),
        &request.end_label(),
        request.start_row,
        request.end_row,
    )?;

    if start_line == 0 || start_line >= end_line || end_line > rows.len() {
        return Err(WorkerError::invalid_request(format!(
            "row range {}-{} does not fit a table of {} rows",
            start_line,
            end_line,
            rows.len()
        )));
    }

    let modifiers = &request.time_modifiers;
    let video_start = window_anchor(&rows, start_line, modifiers.effective_start_offset())?;
    let video_end = window_anchor(&rows, end_line, modifiers.end_offset)?;

    let mut allocator = ClipAllocator::new(pool, &request.settings);
    let mut recorder = AllocationRecorder::new();
    let mut plan_rows = Vec::new();
    let total = end_line - start_line;

    for line in start_line..end_line {
        let index = (line - start_line + 1) as u32;
        let row = &rows[line - 1];
        let next_timing = row_timing(&rows, line + 1)?;

        let audio_start = if line == start_line {
            video_start.clone()
        } else {
            offset_timestamp(row_timing(&rows, line)?.start(), modifiers.time_offset)?
        };
        let audio_end = if line == end_line - 1 {
            video_end.clone()
        } else {
            offset_timestamp(next_timing.start(), modifiers.time_offset)?
        };

        let duration = time_difference(&audio_start, &audio_end)?;
        let text_duration = match next_timing.text_cut() {
            Some(cut) => {
                let cut_at = offset_timestamp(cut, modifiers.time_offset)?;
                time_difference(&audio_start, &cut_at)?
            }
            None => duration,
        };

        let (segments, frame_index) = match request.settings.mode {
            VideoMode::Video => (allocator.allocate(index, duration, decisions)?, None),
            VideoMode::Image => {
                let (segments, frame) = allocator.allocate_still(index, duration, decisions)?;
                (segments, Some(frame))
            }
        };
        recorder.record(index, &segments);
        logger.log_progress(&format!(
            "Assembled verse window {}/{} with {} segments",
            index,
            total,
            segments.len()
        ));

        plan_rows.push(RenderRow {
            index,
            verse_number: row.verse_number.clone(),
            verse_text: row.verse_text.clone(),
            verse_translation: row.verse_translation.clone(),
            start: audio_start,
            end: audio_end,
            duration,
            text_duration,
            segments,
            frame_index,
        });
    }

    save_map(&request.map_path(), recorder.recorded()).await?;

    let plan = RenderPlan {
        video_width: request.settings.video_width,
        video_height: request.settings.video_height,
        mode: request.settings.mode,
        speed: request.settings.speed,
        audio_file: request.audio_file.clone(),
        rows: plan_rows,
    };
    tokio::fs::write(request.plan_path(), serde_json::to_vec_pretty(&plan)?).await?;

    let outcome = RunOutcome {
        run_id: logger.run_id().to_string(),
        verses: plan.rows.len(),
        segments: plan.segment_count(),
        total_duration: plan.total_duration(),
        unresolved_rows,
    };
    logger.log_completion(&format!(
        "Wrote {} and {} covering {:.2}s",
        request.map_path().display(),
        request.plan_path().display(),
        outcome.total_duration
    ));
    Ok(outcome)
}

/// Load the verse table, or seed a fresh one from canonical text when the
/// file does not exist yet.
async fn load_or_seed_table(
    request: &RunRequest,
    provider: &dyn CanonicalTextProvider,
) -> WorkerResult<VerseTable> {
    if tokio::fs::try_exists(&request.verse_table).await? {
        return Ok(VerseTable::load(&request.verse_table, request.columns.clone()).await?);
    }

    info!(
        path = %request.verse_table.display(),
        "Verse table not found, seeding from canonical text"
    );
    let mut table = VerseTable::new(request.columns.clone());
    let verses = chapter_slice(provider.chapter_text(request.chapter).await?, request);
    for (offset, text) in verses.iter().enumerate() {
        let number = format!("{}:{}", request.chapter, request.start_verse as usize + offset);
        table.push_verse(number, text)?;
    }
    Ok(table)
}

/// Fuzzy-align unnumbered table rows against canonical verse text and
/// write the resolved numbers back. Returns how many rows stayed
/// unmatched.
async fn align_table_rows(
    table: &mut VerseTable,
    request: &RunRequest,
    provider: &dyn CanonicalTextProvider,
    logger: &RunLogger,
) -> WorkerResult<usize> {
    let verses = chapter_slice(provider.chapter_text(request.chapter).await?, request);
    let canonical: Vec<CanonicalVerse> = verses
        .iter()
        .enumerate()
        .map(|(offset, text)| {
            CanonicalVerse::new(
                format!("{}:{}", request.chapter, request.start_verse as usize + offset),
                text.clone(),
            )
        })
        .collect();

    let mut rows = table.verse_rows(None)?;
    let report = align_rows(&mut rows, &canonical);
    if report.all_resolved() {
        logger.log_progress(&format!("Aligned {} verse rows", report.assigned));
    } else {
        logger.log_warning(&format!(
            "{} rows left without a verse number after alignment",
            report.unresolved.len()
        ));
    }
    table.apply_verse_numbers(&rows)?;
    Ok(report.unresolved.len())
}

/// Slice a per-chapter list down to the requested verse range.
fn chapter_slice(verses: Vec<String>, request: &RunRequest) -> Vec<String> {
    let start = (request.start_verse as usize).saturating_sub(1);
    let end = (request.end_verse as usize).min(verses.len());
    if start >= end {
        return Vec::new();
    }
    verses[start..end].to_vec()
}

/// Offset anchor timestamp of the 1-based table row.
fn window_anchor(rows: &[VerseRow], line: usize, offset: f64) -> WorkerResult<String> {
    Ok(offset_timestamp(row_timing(rows, line)?.start(), offset)?)
}

fn row_timing(rows: &[VerseRow], line: usize) -> WorkerResult<TimingBoundary> {
    rows.get(line - 1)
        .and_then(|row| row.timing())
        .ok_or_else(|| WorkerError::table_data(format!("Row {} has no timestamp", line)))
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::canonical::MockCanonicalTextProvider;

    struct Scripted {
        trims: VecDeque<f64>,
    }

    impl Scripted {
        fn new(trims: &[f64]) -> Self {
            Self {
                trims: trims.iter().copied().collect(),
            }
        }
    }

    impl DecisionProvider for Scripted {
        fn pick_clip(
            &mut self,
            _verse_index: u32,
            _pool: &[CandidateClip],
            eligible: &[usize],
        ) -> usize {
            eligible.first().copied().unwrap_or(0)
        }

        fn time_offset(&mut self, _verse_index: u32, _max_offset: f64) -> f64 {
            self.trims.pop_front().unwrap_or(0.0)
        }

        fn horizontal_offset(&mut self, _verse_index: u32, _max_offset: u32) -> u32 {
            0
        }

        fn mirrored(&mut self, _verse_index: u32, _allow_mirrored: bool) -> bool {
            false
        }

        fn frame_index(&mut self, _verse_index: u32, _frame_count: u64) -> u64 {
            1
        }
    }

    fn clip(path: &str, total_duration: f64) -> CandidateClip {
        CandidateClip {
            path: PathBuf::from(path),
            total_duration,
            width: 1920,
            height: 1080,
            frame_count: 600,
        }
    }

    fn pool() -> Vec<CandidateClip> {
        vec![
            clip("clips/ocean.mp4", 20.0),
            clip("clips/forest.mp4", 18.0),
            clip("clips/dunes.mp4", 25.0),
        ]
    }

    async fn write_table(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("chapter.tsv");
        tokio::fs::write(&path, text).await.unwrap();
        path
    }

    fn request(dir: &Path, table: &Path, end_verse: u32) -> RunRequest {
        RunRequest::new(
            112,
            1,
            end_verse,
            table,
            dir.join("clips"),
            dir.join("video.mp4"),
        )
    }

    #[tokio::test]
    async fn test_run_with_pool_writes_map_and_plan() {
        let dir = tempfile::tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "verse_number\tverse_text\ttimestamp\n\
             112:1\tqul huwa\t00:01.000\n\
             112:2\tallahu\t00:05.000,00:04.200\n\
             112:3\tlam yalid\t00:09.000\n",
        )
        .await;
        let request = request(dir.path(), &table, 2);
        let provider = MockCanonicalTextProvider::new();
        let mut decisions = Scripted::new(&[0.0, 0.0]);

        let outcome = run_with_pool(&request, &provider, &pool(), &mut decisions)
            .await
            .unwrap();

        assert_eq!(outcome.verses, 2);
        assert_eq!(outcome.segments, 2);

        let plan: RenderPlan = serde_json::from_slice(
            &tokio::fs::read(request.plan_path()).await.unwrap(),
        )
        .unwrap();
        assert_eq!(plan.rows.len(), 2);
        assert_eq!(plan.rows[0].verse_number, "112:1");
        assert_eq!(plan.rows[0].start, "00:00.800");
        assert_eq!(plan.rows[0].end, "00:04.800");
        assert!((plan.rows[0].duration - 4.0).abs() < 1e-9);
        assert!((plan.rows[0].text_duration - 3.2).abs() < 1e-9);
        assert_eq!(plan.rows[1].start, "00:04.800");
        assert_eq!(plan.rows[1].end, "00:09.000");
        assert!((plan.rows[1].text_duration - plan.rows[1].duration).abs() < 1e-9);
        assert_eq!(plan.rows[0].segments[0].path, "clips/ocean.mp4");
        assert_eq!(plan.rows[1].segments[0].path, "clips/forest.mp4");

        let map = versecut_store::load_map(&request.map_path()).await.unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(1).unwrap()[0].path, "clips/ocean.mp4");
    }

    #[tokio::test]
    async fn test_run_with_pool_replays_recorded_map() {
        let dir = tempfile::tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "verse_number\tverse_text\ttimestamp\n\
             112:1\tqul huwa\t00:01.000\n\
             112:2\tallahu\t00:05.000\n\
             112:3\tlam yalid\t00:09.000\n",
        )
        .await;
        let request = request(dir.path(), &table, 2);
        let provider = MockCanonicalTextProvider::new();

        let mut decisions = Scripted::new(&[2.5, 1.0]);
        run_with_pool(&request, &provider, &pool(), &mut decisions)
            .await
            .unwrap();
        let first = tokio::fs::read_to_string(request.map_path()).await.unwrap();

        let recorded = versecut_store::load_map(&request.map_path()).await.unwrap();
        assert!((recorded.get(1).unwrap()[0].time_offset - 2.5).abs() < 1e-9);

        let mut replay = ReplayDecisions::new(recorded);
        run_with_pool(&request, &provider, &pool(), &mut replay)
            .await
            .unwrap();
        let second = tokio::fs::read_to_string(request.map_path()).await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_run_with_markers_reconciles_aligns_and_assembles() {
        let dir = tempfile::tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "verse_number\tverse_text\n\
             \tqul huwa allahu ahad\n\
             \tallahu assamad\n\
             \tlam yalid walam yulad\n",
        )
        .await;
        let markers = dir.path().join("markers.csv");
        tokio::fs::write(
            &markers,
            "Name\tStart\tDuration\tTime Format\tType\tDescription\n\
             Marker 01\t00:01.000\t00:00.000\tdecimal\tCue\t\n\
             Marker 02\t00:05.000\t00:00.000\tdecimal\tCue\t\n\
             Marker 03\t00:09.000\t00:00.000\tdecimal\tCue\t\n\
             Marker 04\t00:12.000\t00:00.000\tdecimal\tCue\t\n",
        )
        .await
        .unwrap();
        let request = RunRequest {
            marker_export: Some(markers),
            ..request(dir.path(), &table, 3)
        };

        let mut provider = MockCanonicalTextProvider::new();
        provider.expect_chapter_text().returning(|_| {
            Ok(vec![
                "qul huwa allahu ahad".to_string(),
                "allahu assamad".to_string(),
                "lam yalid walam yulad".to_string(),
            ])
        });
        let mut decisions = Scripted::new(&[0.0, 0.0, 0.0]);

        let outcome = run_with_pool(&request, &provider, &pool(), &mut decisions)
            .await
            .unwrap();

        assert_eq!(outcome.verses, 3);
        assert_eq!(outcome.unresolved_rows, 0);

        let saved = tokio::fs::read_to_string(&table).await.unwrap();
        assert!(saved.contains("112:2\tallahu assamad\t00:05.000"));
        assert!(saved.ends_with("\t\t00:12.000\n"));

        let plan: RenderPlan = serde_json::from_slice(
            &tokio::fs::read(request.plan_path()).await.unwrap(),
        )
        .unwrap();
        assert_eq!(plan.rows[2].verse_number, "112:3");
        assert_eq!(plan.rows[2].end, "00:12.000");
    }

    #[tokio::test]
    async fn test_missing_row_timestamp_is_a_table_error() {
        let dir = tempfile::tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "verse_number\tverse_text\ttimestamp\n\
             112:1\tqul huwa\t\n\
             112:2\tallahu\t00:05.000\n",
        )
        .await;
        let request = request(dir.path(), &table, 2);
        let provider = MockCanonicalTextProvider::new();
        let mut decisions = Scripted::new(&[]);

        let result = run_with_pool(&request, &provider, &pool(), &mut decisions).await;

        assert!(matches!(result, Err(WorkerError::TableData(_))));
    }

    #[tokio::test]
    async fn test_explicit_rows_outside_table_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let table = write_table(
            dir.path(),
            "verse_number\tverse_text\ttimestamp\n\
             112:1\tqul huwa\t00:01.000\n\
             112:2\tallahu\t00:05.000\n",
        )
        .await;
        let request = RunRequest {
            end_row: Some(2),
            ..request(dir.path(), &table, 2)
        };
        let provider = MockCanonicalTextProvider::new();
        let mut decisions = Scripted::new(&[]);

        let result = run_with_pool(&request, &provider, &pool(), &mut decisions).await;

        assert!(matches!(result, Err(WorkerError::InvalidRequest(_))));
    }
}
