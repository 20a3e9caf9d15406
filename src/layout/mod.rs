/*!
 * Overlay layout: text metrics, geometry and ffmpeg filter rendering.
 *
 * - `metrics`: glyph width estimation and line wrapping
 * - `engine`: header, subtitle footer and focus-box geometry
 * - `filter`: drawbox/drawtext filter chain generation
 */

use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::app_config::LayoutConfig;

pub mod engine;
pub mod filter;
pub mod metrics;

// Re-export main types
pub use self::engine::{Canvas, LayoutEngine, OverlayElement, OverlayPlan};
pub use self::filter::{render_filter, FontSet};
pub use self::metrics::TextMetrics;

/// Fonts with CJK coverage, tried in order
const MAIN_FONT_CANDIDATES: [&str; 6] = [
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "C:\\Windows\\Fonts\\msyh.ttc",
];

/// Fonts with IPA coverage, tried in order
const PHONETIC_FONT_CANDIDATES: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Pick the configured font when it exists, else the first existing candidate
///
/// `None` leaves font selection to ffmpeg.
pub fn resolve_font_file(configured: Option<&str>, candidates: &[&str]) -> Option<PathBuf> {
    if let Some(path) = configured.map(str::trim).filter(|p| !p.is_empty()) {
        if Path::new(path).is_file() {
            return Some(PathBuf::from(path));
        }
        warn!("Configured font not found: {}, trying fallbacks", path);
    }

    let found = candidates
        .iter()
        .map(Path::new)
        .find(|path| path.is_file())
        .map(Path::to_path_buf);

    if found.is_none() {
        debug!("No font file found, using the ffmpeg default font");
    }
    found
}

impl FontSet {
    /// Resolve both font roles from the layout configuration
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            main: resolve_font_file(config.font_file.as_deref(), &MAIN_FONT_CANDIDATES),
            phonetic: resolve_font_file(
                config.phonetic_font_file.as_deref(),
                &PHONETIC_FONT_CANDIDATES,
            ),
        }
    }
}
