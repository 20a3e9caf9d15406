/*!
 * Error types for the vocabcut application.
 *
 * Per-item render failures (`RenderError`) are recorded and skipped by the
 * orchestrator, while `PipelineError` and `JobError` abort a job. Everything
 * funnels into `AppError` at the application boundary.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

use crate::models::RenderStage;

/// Errors raised while driving the external encoder
#[derive(Error, Debug)]
pub enum EncoderError {
    /// The encoder binary could not be started
    #[error("Failed to spawn {program}: {message}")]
    Spawn { program: String, message: String },

    /// The command did not finish within the configured timeout
    #[error("{program} timed out after {secs} seconds")]
    Timeout { program: String, secs: u64 },

    /// The command exited with a non-zero status
    #[error("{program} exited with status {code:?}: {stderr}")]
    ExitStatus {
        program: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Filtered stderr
        stderr: String,
    },

    /// Probe output could not be interpreted
    #[error("Probe failed: {0}")]
    Probe(String),
}

/// A single step of one item failed; the item is skipped
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cut failed: {0}")]
    Cut(#[source] EncoderError),

    #[error("Probe failed: {0}")]
    Probe(#[source] EncoderError),

    #[error("Overlay failed: {0}")]
    Overlay(#[source] EncoderError),

    /// The step reported success but its output is missing or empty
    #[error("Expected output missing or empty after {stage}: {path:?}")]
    MissingOutput { stage: RenderStage, path: PathBuf },
}

impl RenderError {
    /// Stage that produced this failure
    pub fn stage(&self) -> RenderStage {
        match self {
            Self::Cut(_) => RenderStage::Cut,
            Self::Probe(_) => RenderStage::Probe,
            Self::Overlay(_) => RenderStage::Overlay,
            Self::MissingOutput { stage, .. } => *stage,
        }
    }
}

/// Fatal job-level failures
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The job workspace could not be created
    #[error("Failed to create job workspace: {0}")]
    Workspace(#[source] std::io::Error),

    /// The concatenation manifest could not be written
    #[error("Failed to write concatenation manifest: {0}")]
    Manifest(#[source] std::io::Error),

    #[error("Concatenation failed: {0}")]
    ConcatenationFailure(String),

    /// No item rendered, so there is nothing to concatenate
    #[error("No segment rendered successfully ({total} items, failed: {failed_indices:?})")]
    ZeroSuccessfulSegments {
        total: usize,
        failed_indices: Vec<usize>,
    },
}

/// Errors raised while assembling a job
#[derive(Error, Debug)]
pub enum JobError {
    /// Item `index` starts before the previous item ends
    #[error("Item {index} begins at {begin:.3}s before the previous item ends at {previous_end:.3}s")]
    Overlapping {
        index: usize,
        begin: f64,
        previous_end: f64,
    },

    /// The source media file does not exist
    #[error("Source media not found: {0:?}")]
    EmptySource(PathBuf),

    /// A job description could not be read
    #[error("Failed to parse job: {0}")]
    Parse(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
