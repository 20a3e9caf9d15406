/*!
 * Core data model shared by segmentation, selection, layout and rendering.
 *
 * Times are seconds as `f64`, matching what the transcription collaborator
 * produces and what ffmpeg accepts for `-ss`/`-to`.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::JobError;

/// Tolerance used when checking that job items do not overlap
const OVERLAP_TOLERANCE_SECS: f64 = 1e-6;

/// One timed span of recognized speech with an optional parallel translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub begin_time: f64,
    pub end_time: f64,
    pub source_text: String,
    #[serde(default)]
    pub target_text: Option<String>,
}

impl Utterance {
    pub fn new(begin_time: f64, end_time: f64, source_text: &str, target_text: Option<&str>) -> Self {
        Self {
            begin_time,
            end_time,
            source_text: source_text.to_string(),
            target_text: target_text.map(|t| t.to_string()),
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.begin_time
    }

    /// Translation text when present and not blank
    pub fn target(&self) -> Option<&str> {
        self.target_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Text shown for one segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SegmentText {
    /// A single language line
    Mono { text: String },
    /// Source line with its positional translation (either side may be empty)
    Bilingual { source: String, target: String },
}

impl SegmentText {
    pub fn mono(text: impl Into<String>) -> Self {
        Self::Mono { text: text.into() }
    }

    pub fn bilingual(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Bilingual {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Weight used for time allocation: the longer side in characters
    pub fn weight(&self) -> usize {
        match self {
            Self::Mono { text } => text.chars().count(),
            Self::Bilingual { source, target } => {
                source.chars().count().max(target.chars().count())
            }
        }
    }
}

/// A display-sized piece of an utterance with its own time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedSegment {
    pub begin_time: f64,
    pub end_time: f64,
    pub text: SegmentText,
}

impl TimedSegment {
    pub fn new(begin_time: f64, end_time: f64, text: SegmentText) -> Self {
        Self {
            begin_time,
            end_time,
            text,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.begin_time
    }
}

/// A vocabulary item attached to an utterance by the vocabulary collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabAnnotation {
    pub word: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default)]
    pub translation: String,
    /// Corpus frequency rank, lower means more frequent
    #[serde(default)]
    pub frequency_rank: Option<u32>,
    #[serde(default)]
    pub selected: bool,
}

impl VocabAnnotation {
    pub fn new(word: &str, phonetic: &str, translation: &str, frequency_rank: Option<u32>, selected: bool) -> Self {
        Self {
            word: word.to_string(),
            phonetic: phonetic.to_string(),
            translation: translation.to_string(),
            frequency_rank,
            selected,
        }
    }
}

/// A segment plus the focus word shown with it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnItem {
    pub segment: TimedSegment,
    #[serde(default)]
    pub focus: Option<VocabAnnotation>,
}

impl BurnItem {
    pub fn new(segment: TimedSegment, focus: Option<VocabAnnotation>) -> Self {
        Self { segment, focus }
    }
}

/// Which overlay elements are burned into each clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BurnMode {
    /// Title bar, subtitle footer and focus word box
    #[default]
    Full,
    /// Title bar and focus word box only
    KeywordsOnly,
    /// Title bar only
    TitleOnly,
}

impl fmt::Display for BurnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BurnMode::Full => write!(f, "full"),
            BurnMode::KeywordsOnly => write!(f, "keywords_only"),
            BurnMode::TitleOnly => write!(f, "title_only"),
        }
    }
}

impl std::str::FromStr for BurnMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "full" => Ok(BurnMode::Full),
            "keywords_only" | "keywords" => Ok(BurnMode::KeywordsOnly),
            "title_only" | "title" => Ok(BurnMode::TitleOnly),
            _ => Err(anyhow::anyhow!("Invalid burn mode: {}", s)),
        }
    }
}

/// An ordered, non-overlapping set of items rendered from one source video
#[derive(Debug, Clone)]
pub struct Job {
    pub items: Vec<BurnItem>,
    pub source_media: PathBuf,
    pub output: PathBuf,
    pub title: String,
    pub mode: BurnMode,
}

impl Job {
    pub fn new(items: Vec<BurnItem>, source_media: PathBuf, output: PathBuf) -> Self {
        Self {
            items,
            source_media,
            output,
            title: String::new(),
            mode: BurnMode::default(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_mode(mut self, mode: BurnMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check item ordering; each item must start at or after the previous end
    pub fn validate(&self) -> Result<(), JobError> {
        for (index, pair) in self.items.windows(2).enumerate() {
            let previous = &pair[0].segment;
            let current = &pair[1].segment;
            if current.begin_time + OVERLAP_TOLERANCE_SECS < previous.end_time {
                return Err(JobError::Overlapping {
                    index: index + 1,
                    begin: current.begin_time,
                    previous_end: previous.end_time,
                });
            }
        }
        Ok(())
    }
}

/// Step of the per-item render state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStage {
    Cut,
    Probe,
    Overlay,
}

impl fmt::Display for RenderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStage::Cut => write!(f, "cut"),
            RenderStage::Probe => write!(f, "probe"),
            RenderStage::Overlay => write!(f, "overlay"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Rendered { clip: PathBuf },
    Failed { stage: RenderStage, reason: String },
}

/// Outcome of rendering one item; clip paths live in the job workspace
#[derive(Debug, Clone, PartialEq)]
pub struct RenderResult {
    pub index: usize,
    pub outcome: RenderOutcome,
}

impl RenderResult {
    pub fn rendered(index: usize, clip: PathBuf) -> Self {
        Self {
            index,
            outcome: RenderOutcome::Rendered { clip },
        }
    }

    pub fn failed(index: usize, stage: RenderStage, reason: impl Into<String>) -> Self {
        Self {
            index,
            outcome: RenderOutcome::Failed {
                stage,
                reason: reason.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RenderOutcome::Rendered { .. })
    }

    pub fn clip(&self) -> Option<&PathBuf> {
        match &self.outcome {
            RenderOutcome::Rendered { clip } => Some(clip),
            RenderOutcome::Failed { .. } => None,
        }
    }
}

/// Incremental progress emitted after every item
#[derive(Debug, Clone, Default)]
pub struct JobProgress {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub current_word: Option<String>,
}

/// Final per-job report
#[derive(Debug, Clone)]
pub struct JobReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed_indices: Vec<usize>,
    pub output: Option<PathBuf>,
    pub elapsed: Duration,
}

impl JobReport {
    pub fn success_rate(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f32 / self.total as f32 * 100.0
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "Rendered {}/{} segments ({:.1}%)",
            self.succeeded,
            self.total,
            self.success_rate()
        )];

        if !self.failed_indices.is_empty() {
            parts.push(format!("Failed indices: {:?}", self.failed_indices));
        }

        if let Some(ref output) = self.output {
            parts.push(format!("Output: {}", output.display()));
        }

        parts.push(format!("Duration: {:.2}s", self.elapsed.as_secs_f32()));
        parts.join(" | ")
    }
}
