/*!
 * Pipeline orchestrator for one burn job.
 *
 * Items are rendered strictly in order, one encoder call at a time. Once
 * every item is resolved the successful clips are concatenated; a job with
 * no successful item fails without attempting concatenation.
 */

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::encoder::MediaEncoder;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::layout::{FontSet, LayoutEngine};
use crate::models::{Job, JobProgress, JobReport, RenderOutcome, RenderResult};
use crate::render::renderer::SegmentRenderer;
use crate::render::workspace::JobWorkspace;

/// Drives the render state machine over every item of a job
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
    renderer: SegmentRenderer,
    temp_root: Option<PathBuf>,
}

impl PipelineOrchestrator {
    pub fn new(renderer: SegmentRenderer) -> Self {
        Self {
            renderer,
            temp_root: None,
        }
    }

    /// Build the renderer stack from configuration around `encoder`
    pub fn from_config(config: &Config, encoder: Arc<dyn MediaEncoder>) -> Self {
        let engine = LayoutEngine::new(config.layout.clone());
        let fonts = FontSet::from_config(&config.layout);
        let renderer = SegmentRenderer::new(encoder, engine, fonts, config.render.degenerate_epsilon_secs);
        let orchestrator = Self::new(renderer);

        match config.render.temp_root {
            Some(ref root) => orchestrator.with_temp_root(PathBuf::from(root)),
            None => orchestrator,
        }
    }

    /// Create job workspaces under `root` instead of the system temp dir
    pub fn with_temp_root(mut self, root: PathBuf) -> Self {
        self.temp_root = Some(root);
        self
    }

    pub fn renderer(&self) -> &SegmentRenderer {
        &self.renderer
    }

    /// Render every item in order into `workspace`
    pub async fn render_all<F>(&self, job: &Job, workspace: &JobWorkspace, mut on_progress: F) -> Vec<RenderResult>
    where
        F: FnMut(&JobProgress),
    {
        let total = job.items.len();
        let mut progress = JobProgress {
            total,
            ..JobProgress::default()
        };
        let mut results = Vec::with_capacity(total);

        for (index, item) in job.items.iter().enumerate() {
            progress.current_word = item.focus.as_ref().map(|f| f.word.clone());

            let result = self
                .renderer
                .render_item(index, item, &job.source_media, &job.title, job.mode, workspace)
                .await;

            progress.processed += 1;
            if result.is_success() {
                progress.succeeded += 1;
            } else {
                progress.failed += 1;
            }
            on_progress(&progress);

            results.push(result);
        }

        results
    }

    /// Run a whole job and produce its final artifact
    ///
    /// The workspace is released on every exit path, including when the
    /// returned future is dropped before completion.
    pub async fn run<F>(&self, job: &Job, on_progress: F) -> Result<JobReport, PipelineError>
    where
        F: FnMut(&JobProgress),
    {
        let start_time = Instant::now();
        let total = job.items.len();
        info!("Rendering {} items from {:?}", total, job.source_media);

        let workspace = JobWorkspace::create(self.temp_root.as_deref())?;
        let results = self.render_all(job, &workspace, on_progress).await;

        let mut clips = Vec::new();
        let mut failed_indices = Vec::new();
        for result in &results {
            match &result.outcome {
                RenderOutcome::Rendered { clip } => clips.push(clip.clone()),
                RenderOutcome::Failed { stage, reason } => {
                    debug!("Item {} failed at {}: {}", result.index, stage, reason);
                    failed_indices.push(result.index);
                }
            }
        }

        if clips.is_empty() {
            return Err(PipelineError::ZeroSuccessfulSegments {
                total,
                failed_indices,
            });
        }

        if !failed_indices.is_empty() {
            warn!(
                "{} of {} items failed and were skipped: {:?}",
                failed_indices.len(),
                total,
                failed_indices
            );
        }

        let manifest = workspace.write_manifest(&clips)?;
        self.concatenate(&manifest, &job.output).await?;

        if let Err(e) = workspace.close() {
            warn!("Failed to remove job workspace: {}", e);
        }

        Ok(JobReport {
            total,
            succeeded: clips.len(),
            failed_indices,
            output: Some(job.output.clone()),
            elapsed: start_time.elapsed(),
        })
    }

    async fn concatenate(&self, manifest: &Path, output: &Path) -> Result<(), PipelineError> {
        self.renderer
            .encoder()
            .concat(manifest, output)
            .await
            .map_err(|e| PipelineError::ConcatenationFailure(e.to_string()))?;

        if !FileManager::is_non_empty_file(output) {
            return Err(PipelineError::ConcatenationFailure(format!(
                "output {:?} is missing or empty",
                output
            )));
        }

        Ok(())
    }
}
