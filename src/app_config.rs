use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::models::BurnMode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// External encoder settings
    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Overlay geometry and typography
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Job rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Persistent store settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// How clips are cut from the source video
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CutMode {
    // @mode: Stream copy, fast but keyframe-aligned
    #[default]
    Copy,
    // @mode: Re-encode, frame accurate
    Reencode,
}

impl std::fmt::Display for CutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Reencode => write!(f, "reencode"),
        }
    }
}

impl std::str::FromStr for CutMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "copy" => Ok(Self::Copy),
            "reencode" | "re-encode" => Ok(Self::Reencode),
            _ => Err(anyhow!("Invalid cut mode: {}", s)),
        }
    }
}

/// ffmpeg / ffprobe invocation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EncoderConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    // @field: Per-command timeout, 0 disables
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Cut strategy
    #[serde(default)]
    pub cut_mode: CutMode,

    // @field: Video codec used for overlay and re-encoded cuts
    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    // @field: Audio codec used for re-encoded cuts
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    // @field: Encoder preset
    #[serde(default = "default_preset")]
    pub preset: String,

    // @field: Constant rate factor
    #[serde(default = "default_crf")]
    pub crf: u32,

    // @field: Display aspect ratio forced on overlay output (e.g. "9:16")
    #[serde(default)]
    pub aspect: Option<String>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_timeout_secs(),
            cut_mode: CutMode::default(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            preset: default_preset(),
            crf: default_crf(),
            aspect: None,
        }
    }
}

/// Overlay layout settings
///
/// Font sizes and paddings are expressed at `reference_width` and scaled to
/// the probed clip width.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_reference_width")]
    pub reference_width: u32,

    /// Canvas used when a clip cannot be probed
    #[serde(default = "default_canvas_width")]
    pub default_canvas_width: u32,

    #[serde(default = "default_canvas_height")]
    pub default_canvas_height: u32,

    /// Fraction of the canvas width kept free at the sides
    #[serde(default = "default_margin_fraction")]
    pub margin_fraction: f64,

    #[serde(default = "default_wide_glyph_ratio")]
    pub wide_glyph_ratio: f64,

    #[serde(default = "default_narrow_glyph_ratio")]
    pub narrow_glyph_ratio: f64,

    /// Line height as a multiple of the font size
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f64,

    #[serde(default = "default_header_ratio")]
    pub header_ratio: f64,

    #[serde(default = "default_footer_ratio")]
    pub footer_ratio: f64,

    #[serde(default = "default_focus_band_ratio")]
    pub focus_band_ratio: f64,

    #[serde(default = "default_title_font_size")]
    pub title_font_size: u32,

    #[serde(default = "default_source_font_size")]
    pub source_font_size: u32,

    #[serde(default = "default_target_font_size")]
    pub target_font_size: u32,

    #[serde(default = "default_word_font_size")]
    pub word_font_size: u32,

    #[serde(default = "default_min_word_font_size")]
    pub min_word_font_size: u32,

    /// Words longer than this many characters get a smaller font
    #[serde(default = "default_word_shrink_threshold")]
    pub word_shrink_threshold: usize,

    #[serde(default = "default_phonetic_font_size")]
    pub phonetic_font_size: u32,

    #[serde(default = "default_translation_font_size")]
    pub translation_font_size: u32,

    #[serde(default = "default_box_padding_x")]
    pub box_padding_x: u32,

    #[serde(default = "default_box_padding_y")]
    pub box_padding_y: u32,

    #[serde(default = "default_min_box_width_ratio")]
    pub min_box_width_ratio: f64,

    /// Font for titles, subtitles and words
    #[serde(default)]
    pub font_file: Option<String>,

    /// Font with IPA coverage for phonetic lines
    #[serde(default)]
    pub phonetic_font_file: Option<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            reference_width: default_reference_width(),
            default_canvas_width: default_canvas_width(),
            default_canvas_height: default_canvas_height(),
            margin_fraction: default_margin_fraction(),
            wide_glyph_ratio: default_wide_glyph_ratio(),
            narrow_glyph_ratio: default_narrow_glyph_ratio(),
            line_spacing: default_line_spacing(),
            header_ratio: default_header_ratio(),
            footer_ratio: default_footer_ratio(),
            focus_band_ratio: default_focus_band_ratio(),
            title_font_size: default_title_font_size(),
            source_font_size: default_source_font_size(),
            target_font_size: default_target_font_size(),
            word_font_size: default_word_font_size(),
            min_word_font_size: default_min_word_font_size(),
            word_shrink_threshold: default_word_shrink_threshold(),
            phonetic_font_size: default_phonetic_font_size(),
            translation_font_size: default_translation_font_size(),
            box_padding_x: default_box_padding_x(),
            box_padding_y: default_box_padding_y(),
            min_box_width_ratio: default_min_box_width_ratio(),
            font_file: None,
            phonetic_font_file: None,
        }
    }
}

/// Job rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    #[serde(default)]
    pub mode: BurnMode,

    /// Title shown in the header band when the job does not set one
    #[serde(default)]
    pub title_text: String,

    /// Length given to zero or negative duration items
    #[serde(default = "default_degenerate_epsilon_secs")]
    pub degenerate_epsilon_secs: f64,

    /// Suffix appended to the source stem for the output file
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Parent directory for job workspaces, system temp dir when unset
    #[serde(default)]
    pub temp_root: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: BurnMode::default(),
            title_text: String::new(),
            degenerate_epsilon_secs: default_degenerate_epsilon_secs(),
            output_suffix: default_output_suffix(),
            temp_root: None,
        }
    }
}

/// Persistent store settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    /// SQLite file, the platform data directory when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_timeout_secs() -> u64 {
    600 // 10 minutes per ffmpeg command
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_preset() -> String {
    "medium".to_string()
}

fn default_crf() -> u32 {
    23
}

fn default_reference_width() -> u32 {
    720
}

fn default_canvas_width() -> u32 {
    720
}

fn default_canvas_height() -> u32 {
    1280
}

fn default_margin_fraction() -> f64 {
    0.1
}

fn default_wide_glyph_ratio() -> f64 {
    1.0
}

fn default_narrow_glyph_ratio() -> f64 {
    0.55
}

fn default_line_spacing() -> f64 {
    1.25
}

fn default_header_ratio() -> f64 {
    0.1
}

fn default_footer_ratio() -> f64 {
    0.21
}

fn default_focus_band_ratio() -> f64 {
    0.22
}

fn default_title_font_size() -> u32 {
    80
}

fn default_source_font_size() -> u32 {
    36
}

fn default_target_font_size() -> u32 {
    32
}

fn default_word_font_size() -> u32 {
    152
}

fn default_min_word_font_size() -> u32 {
    48
}

fn default_word_shrink_threshold() -> usize {
    10
}

fn default_phonetic_font_size() -> u32 {
    28
}

fn default_translation_font_size() -> u32 {
    48
}

fn default_box_padding_x() -> u32 {
    30
}

fn default_box_padding_y() -> u32 {
    20
}

fn default_min_box_width_ratio() -> f64 {
    0.5
}

fn default_degenerate_epsilon_secs() -> f64 {
    0.1
}

fn default_output_suffix() -> String {
    "_3".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.encoder.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("encoder.ffmpeg_path must not be empty"));
        }
        if self.encoder.ffprobe_path.trim().is_empty() {
            return Err(anyhow!("encoder.ffprobe_path must not be empty"));
        }

        self.layout.validate()?;

        if self.render.degenerate_epsilon_secs < 0.0 {
            return Err(anyhow!(
                "render.degenerate_epsilon_secs must not be negative, got {}",
                self.render.degenerate_epsilon_secs
            ));
        }

        Ok(())
    }
}

impl LayoutConfig {
    /// Check sizes, margins and band ratios
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("reference_width", self.reference_width),
            ("default_canvas_width", self.default_canvas_width),
            ("default_canvas_height", self.default_canvas_height),
            ("title_font_size", self.title_font_size),
            ("source_font_size", self.source_font_size),
            ("target_font_size", self.target_font_size),
            ("word_font_size", self.word_font_size),
            ("min_word_font_size", self.min_word_font_size),
            ("phonetic_font_size", self.phonetic_font_size),
            ("translation_font_size", self.translation_font_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, value)| *value == 0) {
            return Err(anyhow!("layout.{} must be positive", name));
        }

        if self.word_shrink_threshold == 0 {
            return Err(anyhow!("layout.word_shrink_threshold must be positive"));
        }

        if !(0.0..0.5).contains(&self.margin_fraction) {
            return Err(anyhow!(
                "layout.margin_fraction must be in [0, 0.5), got {}",
                self.margin_fraction
            ));
        }

        let ratios = [
            ("wide_glyph_ratio", self.wide_glyph_ratio),
            ("narrow_glyph_ratio", self.narrow_glyph_ratio),
            ("line_spacing", self.line_spacing),
        ];
        if let Some((name, _)) = ratios.iter().find(|(_, value)| *value <= 0.0) {
            return Err(anyhow!("layout.{} must be positive", name));
        }

        let bands = [self.header_ratio, self.footer_ratio, self.focus_band_ratio];
        if bands.iter().any(|r| *r < 0.0) {
            return Err(anyhow!("layout band ratios must not be negative"));
        }
        let band_sum: f64 = bands.iter().sum();
        if band_sum >= 1.0 {
            return Err(anyhow!(
                "layout band ratios must sum to less than 1, got {:.2}",
                band_sum
            ));
        }

        if !(0.0..=1.0).contains(&self.min_box_width_ratio) {
            return Err(anyhow!(
                "layout.min_box_width_ratio must be in [0, 1], got {}",
                self.min_box_width_ratio
            ));
        }

        Ok(())
    }
}
