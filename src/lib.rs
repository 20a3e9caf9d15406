/*!
 * # vocabcut - vocabulary short-video burner
 *
 * A Rust library that turns a transcribed, annotated video into a
 * vocabulary-learning short: each subtitle line is split into display-sized
 * segments, a focus word is picked for it, and every segment is cut and
 * overlaid with a title bar, bilingual subtitles and a focus-word card
 * before the clips are joined into one file.
 *
 * ## Features
 *
 * - Semantic segmentation of source text with positional alignment of the translation
 * - Frequency-ranked focus word selection (COCA-style ranks)
 * - Overlay layout with CJK-aware width estimation and line wrapping
 * - ffmpeg-driven cut, overlay and lossless concatenation
 * - Per-segment failure tolerance with a guaranteed scratch cleanup
 * - JSON job files and a SQLite vocabulary store as job sources
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `models`: Utterances, segments, annotations, jobs and reports
 * - `segmentation`: Text splitting, alignment and time allocation
 * - `keyword_selector`: Focus word selection
 * - `frequency`: Corpus rank lookup
 * - `layout`: Overlay geometry and ffmpeg filter generation
 * - `encoder`: Media encoder trait with ffmpeg and mock implementations
 * - `render`: Segment renderer, job workspace and pipeline orchestrator
 * - `burn_job`: Job assembly, job files and previews
 * - `database`: SQLite vocabulary store
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod burn_job;
pub mod database;
pub mod encoder;
pub mod errors;
pub mod file_utils;
pub mod frequency;
pub mod keyword_selector;
pub mod layout;
pub mod models;
pub mod render;
pub mod segmentation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use burn_job::{assemble_items, AnnotatedUtterance, BurnPreview, JobFile};
pub use encoder::{FfmpegEncoder, MediaEncoder, MockEncoder};
pub use errors::{AppError, EncoderError, JobError, PipelineError, RenderError};
pub use frequency::{FrequencyLookup, FrequencyTable};
pub use keyword_selector::select_focus_word;
pub use models::{BurnItem, BurnMode, Job, JobReport, SegmentText, TimedSegment, Utterance, VocabAnnotation};
pub use render::PipelineOrchestrator;
pub use segmentation::split_utterance;
