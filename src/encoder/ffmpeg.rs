/*!
 * ffmpeg/ffprobe subprocess encoder.
 *
 * Children are spawned with `kill_on_drop`, so dropping an in-flight call
 * (timeout or job cancellation) terminates the process.
 */

use async_trait::async_trait;
use log::{debug, error};
use serde_json::Value;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::{CutMode, EncoderConfig};
use crate::encoder::{MediaEncoder, VideoGeometry};
use crate::errors::EncoderError;

/// Lines of ffmpeg stderr that carry no error information
const NOISE_PREFIXES: [&str; 20] = [
    "ffmpeg version",
    "ffprobe version",
    "built with",
    "configuration:",
    "lib",
    "Input #",
    "Metadata:",
    "Duration:",
    "Chapter",
    "Stream #",
    "title",
    "encoder",
    "handler_name",
    "major_brand",
    "minor_version",
    "compatible_brands",
    "creation_time",
    "Output #",
    "Stream mapping:",
    "Press [q]",
];

/// Encoder backed by the ffmpeg command line tools
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    config: EncoderConfig,
}

impl FfmpegEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Keep only the meaningful lines of ffmpeg stderr
    pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }

    fn seconds(value: f64) -> String {
        format!("{:.3}", value)
    }

    pub(crate) fn cut_args(&self, input: &Path, start: f64, end: f64, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-y".into()];
        match self.config.cut_mode {
            CutMode::Copy => {
                args.extend([
                    "-ss".into(),
                    Self::seconds(start).into(),
                    "-to".into(),
                    Self::seconds(end).into(),
                    "-i".into(),
                    input.as_os_str().to_owned(),
                    "-c".into(),
                    "copy".into(),
                    "-avoid_negative_ts".into(),
                    "make_zero".into(),
                ]);
            }
            CutMode::Reencode => {
                args.extend([
                    "-i".into(),
                    input.as_os_str().to_owned(),
                    "-ss".into(),
                    Self::seconds(start).into(),
                    "-to".into(),
                    Self::seconds(end).into(),
                    "-c:v".into(),
                    self.config.video_codec.clone().into(),
                    "-c:a".into(),
                    self.config.audio_codec.clone().into(),
                ]);
            }
        }
        args.push(output.as_os_str().to_owned());
        args
    }

    pub(crate) fn overlay_args(&self, clip: &Path, filter: &str, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-y".into(),
            "-i".into(),
            clip.as_os_str().to_owned(),
            "-vf".into(),
            filter.into(),
        ];
        if let Some(ref aspect) = self.config.aspect {
            args.extend(["-aspect".into(), aspect.into()]);
        }
        args.extend([
            "-c:a".into(),
            "copy".into(),
            "-c:v".into(),
            self.config.video_codec.clone().into(),
            "-preset".into(),
            self.config.preset.clone().into(),
            "-crf".into(),
            self.config.crf.to_string().into(),
            output.as_os_str().to_owned(),
        ]);
        args
    }

    pub(crate) fn concat_args(manifest: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            manifest.as_os_str().to_owned(),
            "-c".into(),
            "copy".into(),
            output.as_os_str().to_owned(),
        ]
    }

    pub(crate) fn probe_args(clip: &Path) -> Vec<OsString> {
        vec![
            "-v".into(),
            "quiet".into(),
            "-print_format".into(),
            "json".into(),
            "-show_streams".into(),
            "-select_streams".into(),
            "v:0".into(),
            clip.as_os_str().to_owned(),
        ]
    }

    /// Extract the first stream's width and height from ffprobe JSON
    pub fn parse_probe_output(stdout: &str) -> Result<VideoGeometry, EncoderError> {
        let json: Value = serde_json::from_str(stdout)
            .map_err(|e| EncoderError::Probe(format!("invalid ffprobe JSON: {}", e)))?;

        let stream = json
            .get("streams")
            .and_then(|s| s.as_array())
            .and_then(|streams| streams.first())
            .ok_or_else(|| EncoderError::Probe("no video stream found".to_string()))?;

        let dimension = |key: &str| {
            stream
                .get(key)
                .and_then(|v| v.as_u64())
                .filter(|v| *v > 0)
                .map(|v| v as u32)
                .ok_or_else(|| EncoderError::Probe(format!("missing stream {}", key)))
        };

        Ok(VideoGeometry {
            width: dimension("width")?,
            height: dimension("height")?,
        })
    }

    /// Run a command to completion, honoring the configured timeout
    async fn run(&self, program: &str, args: Vec<OsString>) -> Result<Output, EncoderError> {
        debug!("Running {} {:?}", program, args);

        let mut command = Command::new(program);
        command.args(&args).stdin(Stdio::null()).kill_on_drop(true);
        let child = command.output();

        let result = if self.config.timeout_secs == 0 {
            child.await
        } else {
            let timeout_duration = Duration::from_secs(self.config.timeout_secs);
            tokio::select! {
                result = child => result,
                _ = tokio::time::sleep(timeout_duration) => {
                    return Err(EncoderError::Timeout {
                        program: program.to_string(),
                        secs: self.config.timeout_secs,
                    });
                }
            }
        };

        let output = result.map_err(|e| EncoderError::Spawn {
            program: program.to_string(),
            message: e.to_string(),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = Self::filter_ffmpeg_stderr(&stderr);
            error!("{} failed: {}", program, filtered);
            return Err(EncoderError::ExitStatus {
                program: program.to_string(),
                code: output.status.code(),
                stderr: filtered,
            });
        }

        Ok(output)
    }
}

#[async_trait]
impl MediaEncoder for FfmpegEncoder {
    async fn cut(&self, input: &Path, start: f64, end: f64, output: &Path) -> Result<(), EncoderError> {
        let args = self.cut_args(input, start, end, output);
        self.run(&self.config.ffmpeg_path, args).await.map(|_| ())
    }

    async fn probe_geometry(&self, clip: &Path) -> Result<VideoGeometry, EncoderError> {
        let output = self.run(&self.config.ffprobe_path, Self::probe_args(clip)).await?;
        Self::parse_probe_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn overlay(&self, clip: &Path, filter: &str, output: &Path) -> Result<(), EncoderError> {
        let args = self.overlay_args(clip, filter, output);
        self.run(&self.config.ffmpeg_path, args).await.map(|_| ())
    }

    async fn concat(&self, manifest: &Path, output: &Path) -> Result<(), EncoderError> {
        self.run(&self.config.ffmpeg_path, Self::concat_args(manifest, output))
            .await
            .map(|_| ())
    }
}
