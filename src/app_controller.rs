use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::burn_job::{assemble_items, burn_output_path, BurnPreview, JobFile};
use crate::database::Repository;
use crate::encoder::{FfmpegEncoder, MediaEncoder};
use crate::file_utils::{FileManager, FileType};
use crate::frequency::FrequencyLookup;
use crate::models::{BurnItem, BurnMode, Job, JobProgress, JobReport, TimedSegment};
use crate::render::PipelineOrchestrator;

// @module: Application controller for burn jobs

/// Per-run overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct BurnOptions {
    // @field: Output file, replaces the derived name
    pub output: Option<PathBuf>,
    // @field: Overlay mode, replaces the job and config mode
    pub mode: Option<BurnMode>,
    // @field: Header title, replaces the job and config title
    pub title: Option<String>,
    // @field: Render even when the output already exists
    pub force_overwrite: bool,
}

/// What happened to one job
#[derive(Debug)]
pub enum BurnOutcome {
    Rendered(JobReport),
    /// Output already present and overwrite not forced
    Skipped(PathBuf),
}

/// Counts reported by folder runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub rendered: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller for burning vocabulary videos
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Encoder shared by every job
    encoder: Arc<dyn MediaEncoder>,
    // @field: Draw progress bars on stderr
    show_progress: bool,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Ok(Self::with_config(Config::default())?.without_progress())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let encoder = Arc::new(FfmpegEncoder::new(config.encoder.clone()));

        Ok(Self {
            config,
            encoder,
            show_progress: true,
        })
    }

    /// Replace the ffmpeg encoder
    pub fn with_encoder(mut self, encoder: Arc<dyn MediaEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    /// Disable progress bars (tests, non-interactive use)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn orchestrator(&self) -> PipelineOrchestrator {
        PipelineOrchestrator::from_config(&self.config, self.encoder.clone())
    }

    fn apply_options(job: Job, options: &BurnOptions) -> Job {
        let mut job = job;
        if let Some(ref output) = options.output {
            job.output = output.clone();
        }
        if let Some(mode) = options.mode {
            job.mode = mode;
        }
        if let Some(ref title) = options.title {
            job.title = title.clone();
        }
        job
    }

    /// Load a job file and build its job
    pub fn load_job(&self, job_path: &Path, lookup: Option<&dyn FrequencyLookup>) -> Result<Job> {
        let job_file = JobFile::load(job_path)?;
        if FileManager::detect_file_type(&job_file.source_media) != FileType::Video {
            warn!("Source media {:?} does not look like a video file", job_file.source_media);
        }
        Ok(job_file.into_job(&self.config, lookup)?)
    }

    /// Burn the job described by one job file
    pub async fn run_job_file(
        &self,
        job_path: &Path,
        options: &BurnOptions,
        lookup: Option<&dyn FrequencyLookup>,
    ) -> Result<BurnOutcome> {
        if !FileManager::file_exists(job_path) {
            return Err(anyhow!("Job file does not exist: {:?}", job_path));
        }

        info!("Loading job: {:?}", job_path);
        let job = self.load_job(job_path, lookup)?;
        self.run_job(Self::apply_options(job, options), options.force_overwrite)
            .await
    }

    /// Burn every `*.json` job file under a directory
    /// Failing jobs are logged and counted, the rest still run
    pub async fn run_folder(
        &self,
        input_dir: &Path,
        options: &BurnOptions,
        lookup: Option<&dyn FrequencyLookup>,
    ) -> Result<FolderSummary> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let job_files = FileManager::find_files(input_dir, "json")?;
        if job_files.is_empty() {
            return Err(anyhow!("No job files found in directory: {:?}", input_dir));
        }

        let start_time = std::time::Instant::now();
        let mut summary = FolderSummary::default();
        // A single output override cannot apply to several jobs
        let options = BurnOptions {
            output: None,
            ..options.clone()
        };

        for job_path in &job_files {
            match self.run_job_file(job_path, &options, lookup).await {
                Ok(BurnOutcome::Rendered(_)) => summary.rendered += 1,
                Ok(BurnOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing job {:?}: {:#}", job_path, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Folder processing completed: {} rendered, {} skipped, {} errors - Duration: {}",
            summary.rendered,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    async fn series_items(&self, repository: &Repository, series_id: i64) -> Result<Vec<BurnItem>> {
        let utterances = repository
            .ranked_utterances(series_id)
            .await
            .with_context(|| format!("Failed to read subtitles of series {}", series_id))?;

        Ok(assemble_items(&utterances))
    }

    /// Burn a series from the store and record the output on it
    pub async fn run_series(&self, repository: &Repository, series_id: i64, options: &BurnOptions) -> Result<BurnOutcome> {
        let series = repository
            .get_series(series_id)
            .await?
            .ok_or_else(|| anyhow!("Series {} not found", series_id))?;
        let source = series
            .source_media()
            .ok_or_else(|| anyhow!("Series {} has no media file", series_id))?;
        if !FileManager::file_exists(&source) {
            return Err(anyhow!("Source media not found: {:?}", source));
        }

        let items = self.series_items(repository, series_id).await?;
        let output_dir = source.parent().unwrap_or(Path::new("")).to_path_buf();
        let output = burn_output_path(&source, &output_dir, &self.config.render.output_suffix);

        let job = Job::new(items, source, output)
            .with_title(&self.config.render.title_text)
            .with_mode(self.config.render.mode);
        let job = Self::apply_options(job, options);
        job.validate()?;

        let outcome = self.run_job(job, options.force_overwrite).await?;
        if let BurnOutcome::Rendered(ref report) = outcome {
            if let Some(ref output) = report.output {
                repository.record_burn_output(series_id, output).await?;
                info!("Recorded output of series {} ({})", series_id, series.name);
            }
        }

        Ok(outcome)
    }

    /// Render a prepared job with progress reporting
    pub async fn run_job(&self, job: Job, force_overwrite: bool) -> Result<BurnOutcome> {
        if job.output.exists() && !force_overwrite {
            warn!(
                "Skipping job, output already exists: {:?} (use -f to force overwrite)",
                job.output
            );
            return Ok(BurnOutcome::Skipped(job.output));
        }

        if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            FileManager::ensure_dir(parent)?;
        }
        job.validate()?;

        let progress_bar = self.create_progress_bar(job.items.len() as u64);
        let report = self
            .orchestrator()
            .run(&job, |progress| Self::update_progress(&progress_bar, progress))
            .await;

        match report {
            Ok(report) => {
                progress_bar.finish_with_message("Done");
                info!("{}", report.summary());
                info!(
                    "Success: {} ({})",
                    job.output.display(),
                    Self::format_duration(report.elapsed)
                );
                Ok(BurnOutcome::Rendered(report))
            }
            Err(e) => {
                progress_bar.abandon_with_message("Failed");
                Err(e).with_context(|| format!("Failed to burn {:?}", job.source_media))
            }
        }
    }

    /// Summarize a job file without rendering
    pub fn preview_job_file(&self, job_path: &Path, lookup: Option<&dyn FrequencyLookup>) -> Result<BurnPreview> {
        let job_file = JobFile::load(job_path)?;
        Ok(BurnPreview::from_items(&job_file.items(lookup)))
    }

    /// Summarize a stored series without rendering
    pub async fn preview_series(&self, repository: &Repository, series_id: i64) -> Result<BurnPreview> {
        let items = self.series_items(repository, series_id).await?;
        Ok(BurnPreview::from_items(&items))
    }

    /// Timed segments of a job file
    pub fn split_job_file(&self, job_path: &Path) -> Result<Vec<TimedSegment>> {
        Ok(JobFile::load(job_path)?.segments())
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(total);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} segments ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Rendering");
        progress_bar
    }

    fn update_progress(progress_bar: &ProgressBar, progress: &JobProgress) {
        progress_bar.set_position(progress.processed as u64);
        let word = progress.current_word.as_deref().unwrap_or("-");
        if progress.failed > 0 {
            progress_bar.set_message(format!("{} ({} failed)", word, progress.failed));
        } else {
            progress_bar.set_message(word.to_string());
        }
    }

    // Format duration in a human-readable format
    pub fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
