/*!
 * Job assembly from annotated utterances.
 *
 * This module turns utterances plus their vocabulary annotations into the
 * ordered `BurnItem` list the orchestrator renders, reads JSON job files,
 * and summarizes a job before rendering.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::JobError;
use crate::file_utils::FileManager;
use crate::frequency::{FrequencyBand, FrequencyLookup};
use crate::keyword_selector::select_focus_word;
use crate::models::{BurnItem, BurnMode, Job, TimedSegment, Utterance, VocabAnnotation};
use crate::segmentation::split_utterance;

/// Estimated output size per minute of rendered video
const ESTIMATED_MB_PER_MINUTE: f64 = 15.0;

/// Number of focus words listed in a preview
const PREVIEW_SAMPLE_COUNT: usize = 5;

/// An utterance together with the annotations attached to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedUtterance {
    #[serde(flatten)]
    pub utterance: Utterance,

    #[serde(default)]
    pub annotations: Vec<VocabAnnotation>,
}

impl AnnotatedUtterance {
    pub fn new(utterance: Utterance, annotations: Vec<VocabAnnotation>) -> Self {
        Self {
            utterance,
            annotations,
        }
    }
}

/// Split every utterance and attach its focus word to each derived segment
pub fn assemble_items(utterances: &[AnnotatedUtterance]) -> Vec<BurnItem> {
    let mut items = Vec::new();

    for entry in utterances {
        let segments = split_utterance(&entry.utterance);
        if segments.is_empty() {
            debug!(
                "Skipping utterance at {:.3}s without displayable text",
                entry.utterance.begin_time
            );
            continue;
        }

        let focus = select_focus_word(&entry.annotations).cloned();
        items.extend(
            segments
                .into_iter()
                .map(|segment| BurnItem::new(segment, focus.clone())),
        );
    }

    items
}

/// Look up ranks for annotations that do not carry one
pub fn fill_missing_ranks(annotations: &mut [VocabAnnotation], lookup: &dyn FrequencyLookup) {
    for annotation in annotations.iter_mut().filter(|a| a.frequency_rank.is_none()) {
        annotation.frequency_rank = lookup.rank(&annotation.word);
        if annotation.frequency_rank.is_none() {
            debug!("No frequency rank for '{}'", annotation.word);
        }
    }
}

/// Output path for a burned video: the source stem up to its first `_`,
/// followed by `suffix` (`9_1.mp4` becomes `9_3.mp4`)
pub fn burn_output_path(source: &Path, output_dir: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let base = stem.split('_').next().unwrap_or(&stem);

    output_dir.join(format!("{}{}.mp4", base, suffix))
}

/// A burn job described as JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFile {
    /// Source video, relative paths resolve against the job file
    pub source_media: PathBuf,

    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub mode: Option<BurnMode>,

    #[serde(default)]
    pub utterances: Vec<AnnotatedUtterance>,
}

impl JobFile {
    /// Read a job file, resolving relative media and output paths
    pub fn load(path: &Path) -> Result<Self, JobError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| JobError::Parse(format!("cannot read {:?}: {}", path, e)))?;
        let mut job_file: JobFile = serde_json::from_str(&content)
            .map_err(|e| JobError::Parse(format!("invalid job file {:?}: {}", path, e)))?;

        let base = path.parent().unwrap_or(Path::new(""));
        if job_file.source_media.is_relative() {
            job_file.source_media = base.join(&job_file.source_media);
        }
        if let Some(ref output) = job_file.output {
            if output.is_relative() {
                job_file.output = Some(base.join(output));
            }
        }

        Ok(job_file)
    }

    /// Items in render order, ranks filled from `lookup`
    pub fn items(&self, lookup: Option<&dyn FrequencyLookup>) -> Vec<BurnItem> {
        let mut utterances = self.utterances.clone();
        if let Some(lookup) = lookup {
            for entry in utterances.iter_mut() {
                fill_missing_ranks(&mut entry.annotations, lookup);
            }
        }
        assemble_items(&utterances)
    }

    /// Timed segments of every utterance, without focus words
    pub fn segments(&self) -> Vec<TimedSegment> {
        self.utterances
            .iter()
            .flat_map(|entry| split_utterance(&entry.utterance))
            .collect()
    }

    /// Build a validated job, filling unset fields from configuration
    pub fn into_job(self, config: &Config, lookup: Option<&dyn FrequencyLookup>) -> Result<Job, JobError> {
        if !FileManager::file_exists(&self.source_media) {
            return Err(JobError::EmptySource(self.source_media));
        }

        let items = self.items(lookup);
        if items.is_empty() {
            warn!("Job for {:?} has no displayable segments", self.source_media);
        }

        let output = match self.output {
            Some(output) => output,
            None => {
                let dir = self.source_media.parent().unwrap_or(Path::new(""));
                burn_output_path(&self.source_media, dir, &config.render.output_suffix)
            }
        };
        let title = self.title.unwrap_or_else(|| config.render.title_text.clone());
        let mode = self.mode.unwrap_or(config.render.mode);

        let job = Job::new(items, self.source_media, output)
            .with_title(&title)
            .with_mode(mode);
        job.validate()?;

        Ok(job)
    }
}

/// A focus word listed in a preview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewSample {
    pub word: String,
    pub translation: String,
    pub frequency_rank: Option<u32>,
}

/// Summary of a job before rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnPreview {
    pub total_items: usize,
    pub focus_items: usize,
    /// Seconds, rounded to 0.01
    pub total_duration: f64,
    /// Seconds covered by items with a focus word, rounded to 0.01
    pub focus_duration: f64,
    pub band_distribution: BTreeMap<FrequencyBand, usize>,
    pub samples: Vec<PreviewSample>,
    pub estimated_size_mb: f64,
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl BurnPreview {
    pub fn from_items(items: &[BurnItem]) -> Self {
        let mut total_duration = 0.0;
        let mut focus_duration = 0.0;
        let mut focus_items = 0;
        let mut band_distribution = BTreeMap::new();
        let mut samples: Vec<PreviewSample> = Vec::new();
        let mut seen_words: HashSet<&str> = HashSet::new();

        for item in items {
            let duration = item.segment.duration().max(0.0);
            total_duration += duration;

            let Some(ref focus) = item.focus else {
                continue;
            };
            focus_items += 1;
            focus_duration += duration;

            // Items of one utterance share a focus word; count it once
            if !seen_words.insert(focus.word.as_str()) {
                continue;
            }
            if let Some(rank) = focus.frequency_rank {
                *band_distribution.entry(FrequencyBand::from_rank(rank)).or_insert(0) += 1;
            }
            if samples.len() < PREVIEW_SAMPLE_COUNT {
                samples.push(PreviewSample {
                    word: focus.word.clone(),
                    translation: focus.translation.clone(),
                    frequency_rank: focus.frequency_rank,
                });
            }
        }

        Self {
            total_items: items.len(),
            focus_items,
            total_duration: round_hundredths(total_duration),
            focus_duration: round_hundredths(focus_duration),
            band_distribution,
            samples,
            estimated_size_mb: round_hundredths(total_duration / 60.0 * ESTIMATED_MB_PER_MINUTE),
        }
    }
}
