/*!
 * Per-item rendering: cut, probe, overlay.
 *
 * A failing step marks only that item as failed; the caller moves on to the
 * next item.
 */

use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::encoder::MediaEncoder;
use crate::errors::RenderError;
use crate::file_utils::FileManager;
use crate::layout::{render_filter, Canvas, FontSet, LayoutEngine};
use crate::models::{BurnItem, BurnMode, RenderResult, RenderStage};
use crate::render::workspace::JobWorkspace;

/// Renders single items through an encoder
#[derive(Debug, Clone)]
pub struct SegmentRenderer {
    // @field: Shared encoder handle
    encoder: Arc<dyn MediaEncoder>,
    // @field: Overlay geometry
    engine: LayoutEngine,
    // @field: Resolved drawtext fonts
    fonts: FontSet,
    // @field: Length given to empty or inverted intervals
    degenerate_epsilon: f64,
}

/// Interval actually cut for an item; an empty or inverted interval is
/// extended to `epsilon` seconds
pub fn guarded_interval(begin: f64, end: f64, epsilon: f64) -> (f64, f64) {
    if end <= begin {
        (begin, begin + epsilon)
    } else {
        (begin, end)
    }
}

fn ensure_output(stage: RenderStage, path: &Path) -> Result<(), RenderError> {
    if !FileManager::is_non_empty_file(path) {
        return Err(RenderError::MissingOutput {
            stage,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

impl SegmentRenderer {
    pub fn new(encoder: Arc<dyn MediaEncoder>, engine: LayoutEngine, fonts: FontSet, degenerate_epsilon: f64) -> Self {
        Self {
            encoder,
            engine,
            fonts,
            degenerate_epsilon,
        }
    }

    pub fn encoder(&self) -> &Arc<dyn MediaEncoder> {
        &self.encoder
    }

    /// Render one item into the workspace, recording failure instead of returning it
    pub async fn render_item(
        &self,
        index: usize,
        item: &BurnItem,
        source: &Path,
        title: &str,
        mode: BurnMode,
        workspace: &JobWorkspace,
    ) -> RenderResult {
        match self.try_render(index, item, source, title, mode, workspace).await {
            Ok(clip) => RenderResult::rendered(index, clip),
            Err(e) => {
                warn!("Item {} failed at {}: {}", index, e.stage(), e);
                RenderResult::failed(index, e.stage(), e.to_string())
            }
        }
    }

    async fn try_render(
        &self,
        index: usize,
        item: &BurnItem,
        source: &Path,
        title: &str,
        mode: BurnMode,
        workspace: &JobWorkspace,
    ) -> Result<PathBuf, RenderError> {
        let segment = &item.segment;
        let (start, end) = guarded_interval(segment.begin_time, segment.end_time, self.degenerate_epsilon);
        if end != segment.end_time {
            debug!(
                "Item {} has no duration ({:.3}s-{:.3}s), cutting {:.3}s-{:.3}s",
                index, segment.begin_time, segment.end_time, start, end
            );
        }

        // Cut
        let cut_path = workspace.cut_path(index);
        self.encoder
            .cut(source, start, end, &cut_path)
            .await
            .map_err(RenderError::Cut)?;
        ensure_output(RenderStage::Cut, &cut_path)?;

        // Probe
        let canvas: Canvas = match self.encoder.probe_geometry(&cut_path).await {
            Ok(geometry) => geometry.into(),
            Err(e) => {
                let fallback = self.engine.default_canvas();
                warn!(
                    "Could not probe item {} ({}), assuming {}x{}",
                    index, e, fallback.width, fallback.height
                );
                fallback
            }
        };

        // Overlay
        let plan = self.engine.plan(item, title, mode, canvas);
        let filter = render_filter(&plan, &self.fonts);
        let segment_path = workspace.segment_path(index);
        self.encoder
            .overlay(&cut_path, &filter, &segment_path)
            .await
            .map_err(RenderError::Overlay)?;
        ensure_output(RenderStage::Overlay, &segment_path)?;

        if let Err(e) = std::fs::remove_file(&cut_path) {
            debug!("Could not remove intermediate clip {:?}: {}", cut_path, e);
        }

        Ok(segment_path)
    }
}
