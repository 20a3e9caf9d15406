/*!
 * Job-scoped scratch directory.
 *
 * `JobWorkspace` owns a `TempDir`; the directory and every intermediate
 * clip in it are removed when the workspace is dropped, whether the job
 * finished, failed or was cancelled.
 */

use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{Builder, TempDir};

use crate::errors::PipelineError;

const WORKSPACE_PREFIX: &str = "vocabcut-job-";
const MANIFEST_FILENAME: &str = "segments.txt";

#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
}

impl JobWorkspace {
    /// Create a fresh workspace under `root`, or the system temp dir
    pub fn create(root: Option<&Path>) -> Result<Self, PipelineError> {
        let mut builder = Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root).map_err(PipelineError::Workspace)?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(PipelineError::Workspace)?;

        debug!("Created job workspace {:?}", dir.path());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Raw clip cut from the source for item `index`
    pub fn cut_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("cut_{:04}.mp4", index))
    }

    /// Rendered clip for item `index`
    pub fn segment_path(&self, index: usize) -> PathBuf {
        self.dir.path().join(format!("segment_{:04}.mp4", index))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.path().join(MANIFEST_FILENAME)
    }

    /// Write the concat demuxer manifest listing `clips` in order
    pub fn write_manifest(&self, clips: &[PathBuf]) -> Result<PathBuf, PipelineError> {
        let path = self.manifest_path();
        let mut file = std::fs::File::create(&path).map_err(PipelineError::Manifest)?;
        file.write_all(manifest_contents(clips).as_bytes())
            .map_err(PipelineError::Manifest)?;
        file.flush().map_err(PipelineError::Manifest)?;
        Ok(path)
    }

    /// Remove the workspace now, reporting removal errors
    pub fn close(self) -> std::io::Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed job workspace {:?}", path);
        Ok(())
    }
}

/// Quote a path for a concat manifest `file` directive
pub fn quote_manifest_path(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("'{}'", absolute.to_string_lossy().replace('\'', r"'\''"))
}

/// One `file '<path>'` line per clip
pub fn manifest_contents(clips: &[PathBuf]) -> String {
    clips
        .iter()
        .map(|clip| format!("file {}\n", quote_manifest_path(clip)))
        .collect()
}
