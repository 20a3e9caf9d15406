/*!
 * Common test utilities for the vocabcut test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use vocabcut::app_config::Config;
use vocabcut::encoder::MockEncoder;
use vocabcut::models::{BurnItem, Job, SegmentText, TimedSegment, VocabAnnotation};
use vocabcut::render::PipelineOrchestrator;

/// Route library logs to the test output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Placeholder source video; the mock encoder never reads it
pub fn create_source_video(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, "not really a video")
}

pub fn annotation(word: &str, rank: Option<u32>) -> VocabAnnotation {
    VocabAnnotation::new(word, "/fəˈnetɪk/", "释义", rank, true)
}

/// `count` back-to-back two-second items, each with its own focus word
pub fn sample_items(count: usize) -> Vec<BurnItem> {
    (0..count)
        .map(|i| {
            let begin = i as f64 * 2.0;
            let segment = TimedSegment::new(
                begin,
                begin + 2.0,
                SegmentText::bilingual(format!("Line number {}", i), format!("第{}行", i)),
            );
            BurnItem::new(segment, Some(annotation(&format!("word{}", i), Some(3000 + i as u32))))
        })
        .collect()
}

/// A job over `count` sample items writing into `dir`
pub fn sample_job(dir: &Path, count: usize) -> Result<Job> {
    let source = create_source_video(dir, "source_1.mp4")?;
    Ok(Job::new(sample_items(count), source, dir.join("final_3.mp4")).with_title("Test Title"))
}

/// Orchestrator over `encoder` whose workspaces live under `temp_root`
pub fn orchestrator(encoder: Arc<MockEncoder>, temp_root: &Path) -> PipelineOrchestrator {
    PipelineOrchestrator::from_config(&Config::default(), encoder).with_temp_root(temp_root.to_path_buf())
}

/// Entries left under a directory
pub fn dir_entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default()
}

/// JSON job file with two annotated utterances
pub fn write_job_file(dir: &Path, source_name: &str) -> Result<PathBuf> {
    create_source_video(dir, source_name)?;
    let content = format!(
        r#"{{
  "source_media": "{}",
  "title": "Travel English",
  "utterances": [
    {{
      "begin_time": 0.0,
      "end_time": 3.0,
      "source_text": "I like tea, but she likes coffee",
      "target_text": "我喜欢茶，但她喜欢咖啡",
      "annotations": [
        {{ "word": "coffee", "phonetic": "/ˈkɒfi/", "translation": "咖啡", "frequency_rank": 1200, "selected": true }},
        {{ "word": "tea", "phonetic": "/tiː/", "translation": "茶", "frequency_rank": 1800, "selected": false }}
      ]
    }},
    {{
      "begin_time": 3.5,
      "end_time": 5.0,
      "source_text": "See you soon.",
      "annotations": []
    }}
  ]
}}"#,
        source_name
    );
    create_test_file(dir, "job.json", &content)
}
