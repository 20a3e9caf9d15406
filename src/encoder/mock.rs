/*!
 * Scripted encoder for tests.
 *
 * The mock writes small placeholder files instead of media and records every
 * call. Failures are scripted per item index, which is read from the
 * trailing number of the output (or clip) file stem, e.g. `cut_0003.mp4`.
 *
 * - `MockEncoder::working()` - every operation succeeds
 * - `fail_cut_at` / `fail_probe_at` / `fail_overlay_at` - fail one step for given items
 * - `empty_output_at` - overlay succeeds but leaves an empty file
 * - `failing_concat()` - concatenation exits non-zero
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::encoder::{MediaEncoder, VideoGeometry};
use crate::errors::EncoderError;

const MOCK_PROGRAM: &str = "mock-ffmpeg";

/// A recorded encoder invocation
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Cut {
        input: PathBuf,
        start: f64,
        end: f64,
        output: PathBuf,
    },
    Probe {
        clip: PathBuf,
    },
    Overlay {
        clip: PathBuf,
        filter: String,
        output: PathBuf,
    },
    Concat {
        manifest: PathBuf,
        output: PathBuf,
        /// Manifest lines as read at call time
        entries: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct Script {
    fail_cut: HashSet<usize>,
    fail_probe: HashSet<usize>,
    fail_overlay: HashSet<usize>,
    empty_output: HashSet<usize>,
    failing_concat: bool,
    empty_concat: bool,
    geometry: Option<VideoGeometry>,
    cut_delay: Option<Duration>,
}

/// Mock encoder for testing pipeline behavior
#[derive(Debug, Default)]
pub struct MockEncoder {
    script: Script,
    calls: Mutex<Vec<MockCall>>,
}

impl MockEncoder {
    /// Create a mock encoder where every operation succeeds
    pub fn working() -> Self {
        Self {
            script: Script {
                geometry: Some(VideoGeometry {
                    width: 720,
                    height: 1280,
                }),
                ..Script::default()
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail the cut step for the given item indices
    pub fn fail_cut_at(mut self, indices: &[usize]) -> Self {
        self.script.fail_cut.extend(indices);
        self
    }

    /// Fail the probe step for the given item indices
    pub fn fail_probe_at(mut self, indices: &[usize]) -> Self {
        self.script.fail_probe.extend(indices);
        self
    }

    /// Fail the overlay step for the given item indices
    pub fn fail_overlay_at(mut self, indices: &[usize]) -> Self {
        self.script.fail_overlay.extend(indices);
        self
    }

    /// Report overlay success but leave an empty output for the given indices
    pub fn empty_output_at(mut self, indices: &[usize]) -> Self {
        self.script.empty_output.extend(indices);
        self
    }

    /// Make concatenation exit non-zero
    pub fn failing_concat(mut self) -> Self {
        self.script.failing_concat = true;
        self
    }

    /// Make concatenation succeed without writing any bytes
    pub fn empty_concat(mut self) -> Self {
        self.script.empty_concat = true;
        self
    }

    /// Geometry reported by probes
    pub fn with_geometry(mut self, width: u32, height: u32) -> Self {
        self.script.geometry = Some(VideoGeometry { width, height });
        self
    }

    /// Sleep before every cut completes
    pub fn with_cut_delay(mut self, delay: Duration) -> Self {
        self.script.cut_delay = Some(delay);
        self
    }

    /// All recorded calls in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn cut_calls(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, MockCall::Cut { .. }))
            .collect()
    }

    pub fn overlay_calls(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, MockCall::Overlay { .. }))
            .collect()
    }

    pub fn concat_calls(&self) -> Vec<MockCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, MockCall::Concat { .. }))
            .collect()
    }

    /// Item index encoded in a workspace file name
    pub fn index_of(path: &Path) -> Option<usize> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.rsplit('_').next())
            .and_then(|digits| digits.parse().ok())
    }

    fn scripted(set: &HashSet<usize>, path: &Path) -> bool {
        Self::index_of(path).is_some_and(|index| set.contains(&index))
    }

    fn exit_failure(step: &str) -> EncoderError {
        EncoderError::ExitStatus {
            program: MOCK_PROGRAM.to_string(),
            code: Some(1),
            stderr: format!("scripted {} failure", step),
        }
    }

    fn write(path: &Path, contents: &[u8]) -> Result<(), EncoderError> {
        std::fs::write(path, contents).map_err(|e| EncoderError::ExitStatus {
            program: MOCK_PROGRAM.to_string(),
            code: Some(1),
            stderr: e.to_string(),
        })
    }
}

#[async_trait]
impl MediaEncoder for MockEncoder {
    async fn cut(&self, input: &Path, start: f64, end: f64, output: &Path) -> Result<(), EncoderError> {
        self.calls.lock().push(MockCall::Cut {
            input: input.to_path_buf(),
            start,
            end,
            output: output.to_path_buf(),
        });

        if let Some(delay) = self.script.cut_delay {
            tokio::time::sleep(delay).await;
        }

        if Self::scripted(&self.script.fail_cut, output) {
            return Err(Self::exit_failure("cut"));
        }
        Self::write(output, format!("clip {:.3}-{:.3}", start, end).as_bytes())
    }

    async fn probe_geometry(&self, clip: &Path) -> Result<VideoGeometry, EncoderError> {
        self.calls.lock().push(MockCall::Probe {
            clip: clip.to_path_buf(),
        });

        if Self::scripted(&self.script.fail_probe, clip) {
            return Err(EncoderError::Probe("scripted probe failure".to_string()));
        }
        self.script
            .geometry
            .ok_or_else(|| EncoderError::Probe("no geometry scripted".to_string()))
    }

    async fn overlay(&self, clip: &Path, filter: &str, output: &Path) -> Result<(), EncoderError> {
        self.calls.lock().push(MockCall::Overlay {
            clip: clip.to_path_buf(),
            filter: filter.to_string(),
            output: output.to_path_buf(),
        });

        if Self::scripted(&self.script.fail_overlay, output) {
            return Err(Self::exit_failure("overlay"));
        }
        if Self::scripted(&self.script.empty_output, output) {
            return Self::write(output, b"");
        }
        Self::write(output, b"rendered segment")
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError> {
        let entries = std::fs::read_to_string(manifest)
            .map(|content| content.lines().map(str::to_string).collect())
            .unwrap_or_default();

        self.calls.lock().push(MockCall::Concat {
            manifest: manifest.to_path_buf(),
            output: output.to_path_buf(),
            entries,
        });

        if self.script.failing_concat {
            return Err(Self::exit_failure("concat"));
        }
        if self.script.empty_concat {
            return Self::write(output, b"");
        }
        Self::write(output, b"final video")
    }
}
