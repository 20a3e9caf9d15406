/*!
 * Tests for job files, job assembly and previews
 */

use std::collections::HashMap;

use crate::common;
use vocabcut::app_config::Config;
use vocabcut::burn_job::{burn_output_path, BurnPreview, JobFile};
use vocabcut::errors::JobError;
use vocabcut::frequency::{FrequencyBand, FrequencyLookup};
use vocabcut::models::{BurnMode, SegmentText};

struct MapLookup(HashMap<&'static str, u32>);

impl FrequencyLookup for MapLookup {
    fn rank(&self, word: &str) -> Option<u32> {
        self.0.get(word).copied()
    }
}

#[test]
fn test_load_shouldResolveSourceAgainstJobFile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4").unwrap();

    let job_file = JobFile::load(&job_path).unwrap();

    assert_eq!(job_file.source_media, temp_dir.path().join("lesson_1.mp4"));
    assert_eq!(job_file.title.as_deref(), Some("Travel English"));
    assert_eq!(job_file.utterances.len(), 2);
    assert_eq!(job_file.utterances[0].annotations.len(), 2);
    assert!(job_file.utterances[1].utterance.target_text.is_none());
}

#[test]
fn test_load_withInvalidJson_shouldReturnParseError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::create_test_file(temp_dir.path(), "broken.json", "{ \"utterances\": [").unwrap();

    let result = JobFile::load(&job_path);
    assert!(matches!(result, Err(JobError::Parse(_))));
}

#[test]
fn test_load_withMissingFile_shouldReturnParseError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = JobFile::load(&temp_dir.path().join("absent.json"));
    assert!(matches!(result, Err(JobError::Parse(_))));
}

#[test]
fn test_intoJob_shouldDeriveOutputAndKeepFileTitle() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4").unwrap();
    let mut config = Config::default();
    config.render.title_text = "Configured".to_string();
    config.render.mode = BurnMode::KeywordsOnly;

    let job = JobFile::load(&job_path).unwrap().into_job(&config, None).unwrap();

    assert_eq!(job.output, temp_dir.path().join("lesson_3.mp4"));
    assert_eq!(job.title, "Travel English");
    assert_eq!(job.mode, BurnMode::KeywordsOnly);
    assert!(!job.items.is_empty());
}

#[test]
fn test_intoJob_shouldAttachFocusPerUtterance() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4").unwrap();

    let job = JobFile::load(&job_path)
        .unwrap()
        .into_job(&Config::default(), None)
        .unwrap();

    let (first, rest): (Vec<_>, Vec<_>) = job.items.iter().partition(|item| item.segment.end_time <= 3.0);
    assert!(!first.is_empty());
    for item in &first {
        assert_eq!(item.focus.as_ref().map(|f| f.word.as_str()), Some("coffee"));
        assert!(matches!(item.segment.text, SegmentText::Bilingual { .. }));
    }
    assert_eq!(rest.len(), 1);
    assert!(rest[0].focus.is_none());
    assert_eq!(rest[0].segment.text, SegmentText::mono("See you soon."));

    // segments of one utterance tile its interval
    assert_eq!(first[0].segment.begin_time, 0.0);
    assert_eq!(first.last().unwrap().segment.end_time, 3.0);
    for pair in first.windows(2) {
        assert!((pair[0].segment.end_time - pair[1].segment.begin_time).abs() < 1e-9);
    }
}

#[test]
fn test_intoJob_withMissingSource_shouldReturnEmptySource() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::create_test_file(
        temp_dir.path(),
        "job.json",
        r#"{ "source_media": "missing.mp4", "utterances": [] }"#,
    )
    .unwrap();

    let result = JobFile::load(&job_path).unwrap().into_job(&Config::default(), None);
    assert!(matches!(result, Err(JobError::EmptySource(_))));
}

#[test]
fn test_intoJob_withOverlappingUtterances_shouldFailValidation() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_source_video(temp_dir.path(), "clip.mp4").unwrap();
    let job_path = common::create_test_file(
        temp_dir.path(),
        "job.json",
        r#"{
  "source_media": "clip.mp4",
  "utterances": [
    { "begin_time": 0.0, "end_time": 2.0, "source_text": "First line." },
    { "begin_time": 1.5, "end_time": 3.0, "source_text": "Second line." }
  ]
}"#,
    )
    .unwrap();

    let result = JobFile::load(&job_path).unwrap().into_job(&Config::default(), None);
    assert!(matches!(result, Err(JobError::Overlapping { index: 1, .. })));
}

#[test]
fn test_items_withLookup_shouldRankUnrankedAnnotations() {
    let temp_dir = common::create_temp_dir().unwrap();
    common::create_source_video(temp_dir.path(), "clip.mp4").unwrap();
    let job_path = common::create_test_file(
        temp_dir.path(),
        "job.json",
        r#"{
  "source_media": "clip.mp4",
  "utterances": [
    {
      "begin_time": 0.0,
      "end_time": 2.0,
      "source_text": "The soup is delicious",
      "annotations": [
        { "word": "soup", "selected": true },
        { "word": "delicious", "selected": true, "frequency_rank": 3000 }
      ]
    }
  ]
}"#,
    )
    .unwrap();
    let job_file = JobFile::load(&job_path).unwrap();
    let table = MapLookup(HashMap::from([("soup", 4500), ("delicious", 100)]));
    let lookup: &dyn FrequencyLookup = &table;

    let without_lookup = job_file.items(None);
    assert_eq!(without_lookup[0].focus.as_ref().unwrap().word, "delicious");

    // explicit ranks are kept, missing ones come from the lookup
    let with_lookup = job_file.items(Some(lookup));
    let focus = with_lookup[0].focus.as_ref().unwrap();
    assert_eq!(focus.word, "soup");
    assert_eq!(focus.frequency_rank, Some(4500));
}

#[test]
fn test_segments_shouldCoverEveryUtterance() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4").unwrap();

    let segments = JobFile::load(&job_path).unwrap().segments();

    assert!(segments.len() >= 2);
    assert_eq!(segments.last().unwrap().begin_time, 3.5);
    assert_eq!(segments.last().unwrap().end_time, 5.0);
}

#[test]
fn test_preview_shouldSummarizeFocusWords() {
    let temp_dir = common::create_temp_dir().unwrap();
    let job_path = common::write_job_file(temp_dir.path(), "lesson_1.mp4").unwrap();
    let job_file = JobFile::load(&job_path).unwrap();
    let items = job_file.items(None);

    let preview = BurnPreview::from_items(&items);

    assert_eq!(preview.total_items, items.len());
    assert_eq!(preview.focus_items, items.len() - 1);
    assert!((preview.total_duration - 4.5).abs() < 1e-9);
    assert!((preview.focus_duration - 3.0).abs() < 1e-9);
    assert_eq!(preview.band_distribution.get(&FrequencyBand::Mid), Some(&1));
    assert_eq!(preview.band_distribution.values().sum::<usize>(), 1);
    assert_eq!(preview.samples.len(), 1);
    assert_eq!(preview.samples[0].word, "coffee");
    assert_eq!(preview.samples[0].translation, "咖啡");
    assert!((preview.estimated_size_mb - 1.125).abs() < 0.01);
}

#[test]
fn test_preview_withSampleItems_shouldCapSamples() {
    let preview = BurnPreview::from_items(&common::sample_items(8));

    assert_eq!(preview.total_items, 8);
    assert_eq!(preview.focus_items, 8);
    assert_eq!(preview.samples.len(), 5);
    assert_eq!(preview.band_distribution.get(&FrequencyBand::MidLow), Some(&8));
    assert!((preview.total_duration - 16.0).abs() < 1e-9);
}

#[test]
fn test_burnOutputPath_withoutUnderscore_shouldAppendSuffix() {
    let path = burn_output_path(
        std::path::Path::new("/videos/lesson.mp4"),
        std::path::Path::new("/out"),
        "_3",
    );
    assert_eq!(path, std::path::PathBuf::from("/out/lesson_3.mp4"));
}
