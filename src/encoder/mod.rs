/*!
 * External media encoder interface.
 *
 * Every media operation of the pipeline goes through `MediaEncoder`:
 * - `ffmpeg`: the real implementation driving ffmpeg/ffprobe subprocesses
 * - `mock`: a scripted in-process implementation for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;

use crate::errors::EncoderError;
use crate::layout::Canvas;

pub mod ffmpeg;
pub mod mock;

pub use self::ffmpeg::FfmpegEncoder;
pub use self::mock::MockEncoder;

/// Frame size reported by a probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
}

impl From<VideoGeometry> for Canvas {
    fn from(geometry: VideoGeometry) -> Self {
        Canvas::new(geometry.width, geometry.height)
    }
}

/// Common trait for media encoders
///
/// Implementations must not return before the underlying work has finished,
/// so the caller can inspect outputs right after each call.
#[async_trait]
pub trait MediaEncoder: Send + Sync + Debug {
    /// Extract `[start, end)` seconds of `input` into `output`
    async fn cut(&self, input: &Path, start: f64, end: f64, output: &Path) -> Result<(), EncoderError>;

    /// Read the frame size of the first video stream of `clip`
    async fn probe_geometry(&self, clip: &Path) -> Result<VideoGeometry, EncoderError>;

    /// Burn the filter chain into `clip`, writing `output`
    async fn overlay(&self, clip: &Path, filter: &str, output: &Path) -> Result<(), EncoderError>;

    /// Losslessly concatenate the clips listed in `manifest` into `output`
    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError>;
}
