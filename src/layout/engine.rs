/*!
 * Overlay layout computation.
 *
 * The canvas is divided into a header band (title), a footer band
 * (subtitles) and a focus band directly above the footer holding the
 * focus-word box. All sizes in `LayoutConfig` are given at the reference
 * width and scaled to the actual canvas width.
 */

use log::trace;
use serde::Serialize;

use crate::app_config::LayoutConfig;
use crate::layout::metrics::TextMetrics;
use crate::models::{BurnItem, BurnMode, SegmentText, VocabAnnotation};

const HEADER_FILL: &str = "black";
const TITLE_COLOR: &str = "white";
const FOOTER_FILL: &str = "#fbfbf3";
const SUBTITLE_COLOR: &str = "#FFFF00";
const FOCUS_FILL: &str = "#FFFF00";
const FOCUS_TEXT_COLOR: &str = "black";

/// Pixel size of the frame the overlay is drawn on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Which font file a text element is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontRole {
    Main,
    Phonetic,
}

/// Outline or shadow drawn around text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TextDecoration {
    Plain,
    Border { color: String, width: u32 },
    Shadow { color: String, offset: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum OverlayElement {
    /// Solid rectangle
    Fill {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    /// One line of text, horizontally centered on `center_x`, top at `y`
    Text {
        text: String,
        center_x: f64,
        y: f64,
        font_size: u32,
        color: String,
        font: FontRole,
        decoration: TextDecoration,
    },
}

/// Ordered drawing instructions for one clip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayPlan {
    pub canvas: Canvas,
    pub elements: Vec<OverlayElement>,
}

impl OverlayPlan {
    pub fn texts(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                OverlayElement::Text { text, .. } => Some(text.as_str()),
                OverlayElement::Fill { .. } => None,
            })
            .collect()
    }
}

/// A laid-out line of text
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub font_size: f64,
    pub font: FontRole,
}

/// Geometry of the focus-word box
#[derive(Debug, Clone, PartialEq)]
pub struct FocusBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub lines: Vec<PlacedLine>,
}

/// Computes overlay plans from a layout configuration
#[derive(Debug, Clone)]
pub struct LayoutEngine {
    config: LayoutConfig,
    metrics: TextMetrics,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        let metrics = TextMetrics::from_config(&config);
        Self { config, metrics }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn metrics(&self) -> &TextMetrics {
        &self.metrics
    }

    /// Canvas used when a clip's geometry is unknown
    pub fn default_canvas(&self) -> Canvas {
        Canvas::new(self.config.default_canvas_width, self.config.default_canvas_height)
    }

    fn scale(&self, canvas: Canvas) -> f64 {
        canvas.width as f64 / self.config.reference_width as f64
    }

    fn scaled(&self, size: u32, canvas: Canvas) -> f64 {
        (size as f64 * self.scale(canvas)).max(1.0)
    }

    fn line_height(&self, font_size: f64) -> f64 {
        font_size * self.config.line_spacing
    }

    fn block_height(&self, lines: &[PlacedLine]) -> f64 {
        lines.iter().map(|line| self.line_height(line.font_size)).sum()
    }

    /// Font size for the focus word
    ///
    /// Long words shrink proportionally past the threshold, the result is
    /// capped so the word fits inside the box, and never drops below the
    /// configured minimum.
    pub fn word_font_size(&self, word: &str, canvas: Canvas) -> f64 {
        let nominal = self.scaled(self.config.word_font_size, canvas);
        let minimum = self.scaled(self.config.min_word_font_size, canvas);
        let threshold = self.config.word_shrink_threshold;
        let length = word.chars().count();

        let mut size = if length <= threshold {
            nominal
        } else {
            nominal * threshold as f64 / length as f64
        };

        let padding = self.scaled(self.config.box_padding_x, canvas);
        let available = self.metrics.usable_width(canvas.width as f64) - 2.0 * padding;
        let width = self.metrics.estimate_width(word, size);
        if width > available && width > 0.0 {
            size *= available / width;
        }

        size.max(minimum)
    }

    /// Lay out the focus box so it is centered in the band ending at `band_bottom`
    pub fn focus_box(&self, annotation: &VocabAnnotation, canvas: Canvas, band_bottom: f64) -> FocusBox {
        let canvas_width = canvas.width as f64;
        let usable = self.metrics.usable_width(canvas_width);
        let padding_x = self.scaled(self.config.box_padding_x, canvas);
        let padding_y = self.scaled(self.config.box_padding_y, canvas);
        let inner_width = (usable - 2.0 * padding_x).max(1.0);

        let mut lines = Vec::new();

        // a word still too wide at the minimum size wraps onto extra lines
        let word = annotation.word.trim();
        if !word.is_empty() {
            let word_size = self.word_font_size(word, canvas);
            for text in self.metrics.wrap_lines(&[word], word_size, inner_width) {
                lines.push(PlacedLine {
                    text,
                    font_size: word_size,
                    font: FontRole::Main,
                });
            }
        }

        let phonetic_size = self.scaled(self.config.phonetic_font_size, canvas);
        for text in self.metrics.wrap_lines(&[annotation.phonetic.trim()], phonetic_size, inner_width) {
            lines.push(PlacedLine {
                text,
                font_size: phonetic_size,
                font: FontRole::Phonetic,
            });
        }

        let translation_size = self.scaled(self.config.translation_font_size, canvas);
        for text in self.metrics.wrap_lines(&[annotation.translation.trim()], translation_size, inner_width) {
            lines.push(PlacedLine {
                text,
                font_size: translation_size,
                font: FontRole::Main,
            });
        }

        let widest = lines
            .iter()
            .map(|line| self.metrics.estimate_width(&line.text, line.font_size))
            .fold(0.0, f64::max);

        let min_width = self.config.min_box_width_ratio * canvas_width;
        let width = (widest + 2.0 * padding_x).max(min_width).min(usable);
        let height = 2.0 * padding_y + self.block_height(&lines);

        let band_height = self.config.focus_band_ratio * canvas.height as f64;
        let band_top = band_bottom - band_height;
        let y = (band_top + (band_height - height) / 2.0).max(0.0);
        let x = (canvas_width - width) / 2.0;

        FocusBox {
            x,
            y,
            width,
            height,
            lines,
        }
    }

    /// Subtitle lines for a segment, wrapped to the usable width
    pub fn subtitle_lines(&self, text: &SegmentText, canvas: Canvas) -> Vec<PlacedLine> {
        let usable = self.metrics.usable_width(canvas.width as f64);
        let source_size = self.scaled(self.config.source_font_size, canvas);
        let target_size = self.scaled(self.config.target_font_size, canvas);

        let place = |text: &str, size: f64| -> Vec<PlacedLine> {
            self.metrics
                .wrap_lines(&[text], size, usable)
                .into_iter()
                .map(|line| PlacedLine {
                    text: line,
                    font_size: size,
                    font: FontRole::Main,
                })
                .collect()
        };

        match text {
            SegmentText::Mono { text } => place(text, source_size),
            SegmentText::Bilingual { source, target } => {
                let mut lines = place(source, source_size);
                lines.extend(place(target, target_size));
                lines
            }
        }
    }

    fn push_block(
        &self,
        elements: &mut Vec<OverlayElement>,
        lines: &[PlacedLine],
        top: f64,
        center_x: f64,
        color: &str,
        decoration: &TextDecoration,
    ) {
        let mut cursor = top;
        for line in lines {
            let line_height = self.line_height(line.font_size);
            elements.push(OverlayElement::Text {
                text: line.text.clone(),
                center_x,
                y: cursor + (line_height - line.font_size) / 2.0,
                font_size: line.font_size.round() as u32,
                color: color.to_string(),
                font: line.font,
                decoration: decoration.clone(),
            });
            cursor += line_height;
        }
    }

    /// Compute every overlay element for one item
    pub fn plan(&self, item: &BurnItem, title: &str, mode: BurnMode, canvas: Canvas) -> OverlayPlan {
        let width = canvas.width as f64;
        let height = canvas.height as f64;
        let center_x = width / 2.0;
        let usable = self.metrics.usable_width(width);
        let mut elements = Vec::new();

        // Header band with the title
        let header_height = self.config.header_ratio * height;
        elements.push(OverlayElement::Fill {
            x: 0.0,
            y: 0.0,
            width,
            height: header_height,
            color: HEADER_FILL.to_string(),
        });

        let title_size = self.scaled(self.config.title_font_size, canvas);
        let title_lines: Vec<PlacedLine> = self
            .metrics
            .wrap_lines(&[title.trim()], title_size, usable)
            .into_iter()
            .map(|text| PlacedLine {
                text,
                font_size: title_size,
                font: FontRole::Main,
            })
            .collect();
        let title_top = (header_height - self.block_height(&title_lines)) / 2.0;
        self.push_block(
            &mut elements,
            &title_lines,
            title_top,
            center_x,
            TITLE_COLOR,
            &TextDecoration::Shadow {
                color: "black@0.6".to_string(),
                offset: 1,
            },
        );

        // Footer band with subtitles
        let footer_height = self.config.footer_ratio * height;
        let footer_top = height - footer_height;
        if mode == BurnMode::Full {
            elements.push(OverlayElement::Fill {
                x: 0.0,
                y: footer_top,
                width,
                height: footer_height,
                color: FOOTER_FILL.to_string(),
            });

            let lines = self.subtitle_lines(&item.segment.text, canvas);
            let top = footer_top + (footer_height - self.block_height(&lines)) / 2.0;
            self.push_block(
                &mut elements,
                &lines,
                top,
                center_x,
                SUBTITLE_COLOR,
                &TextDecoration::Border {
                    color: "black".to_string(),
                    width: 2,
                },
            );
        }

        // Focus word box
        if mode != BurnMode::TitleOnly {
            if let Some(ref focus) = item.focus {
                let band_bottom = if mode == BurnMode::Full {
                    footer_top
                } else {
                    height - self.config.margin_fraction / 2.0 * height
                };
                let focus_box = self.focus_box(focus, canvas, band_bottom);
                trace!(
                    "Focus box for '{}': {:.0}x{:.0} at ({:.0}, {:.0})",
                    focus.word, focus_box.width, focus_box.height, focus_box.x, focus_box.y
                );

                elements.push(OverlayElement::Fill {
                    x: focus_box.x,
                    y: focus_box.y,
                    width: focus_box.width,
                    height: focus_box.height,
                    color: FOCUS_FILL.to_string(),
                });
                let padding_y = self.scaled(self.config.box_padding_y, canvas);
                self.push_block(
                    &mut elements,
                    &focus_box.lines,
                    focus_box.y + padding_y,
                    center_x,
                    FOCUS_TEXT_COLOR,
                    &TextDecoration::Plain,
                );
            }
        }

        OverlayPlan { canvas, elements }
    }
}
