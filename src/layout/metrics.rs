/*!
 * Approximate text metrics.
 *
 * No font is rasterized: a glyph is either wide (CJK, Hangul, fullwidth)
 * or narrow, and each class has a fixed advance relative to the font size.
 */

use crate::app_config::LayoutConfig;

/// Continuation marker appended to hard-cut pieces
pub const CONTINUATION_MARKER: char = '-';

/// Whether a character renders at full (square) width
pub fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F
            | 0x2E80..=0xA4CF
            | 0xAC00..=0xD7A3
            | 0xF900..=0xFAFF
            | 0xFE30..=0xFE4F
            | 0xFF00..=0xFF60
            | 0xFFE0..=0xFFE6
            | 0x20000..=0x3FFFD
    )
}

/// Glyph width estimator bound to a layout configuration
#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub wide_ratio: f64,
    pub narrow_ratio: f64,
    pub margin_fraction: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

/// A break opportunity produced while tokenizing a line
struct Token {
    text: String,
    space_before: bool,
}

impl TextMetrics {
    pub fn from_config(config: &LayoutConfig) -> Self {
        Self {
            wide_ratio: config.wide_glyph_ratio,
            narrow_ratio: config.narrow_glyph_ratio,
            margin_fraction: config.margin_fraction,
        }
    }

    fn char_width(&self, c: char, font_size: f64) -> f64 {
        if is_wide(c) {
            font_size * self.wide_ratio
        } else {
            font_size * self.narrow_ratio
        }
    }

    /// Estimated rendered width of `text`
    pub fn estimate_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().map(|c| self.char_width(c, font_size)).sum()
    }

    /// Width available for text on a canvas
    pub fn usable_width(&self, canvas_width: f64) -> f64 {
        canvas_width * (1.0 - self.margin_fraction)
    }

    /// Greedily wrap lines so each fits `max_width`
    ///
    /// Spaces and every wide glyph are break opportunities. A token that is
    /// wider than `max_width` on its own is hard-cut, with every piece but
    /// the last ending in the continuation marker. Blank input lines are
    /// dropped.
    pub fn wrap_lines<S: AsRef<str>>(&self, lines: &[S], font_size: f64, max_width: f64) -> Vec<String> {
        let mut wrapped = Vec::new();

        for line in lines {
            let mut current = String::new();

            for token in tokenize(line.as_ref()) {
                let candidate = if current.is_empty() {
                    token.text.clone()
                } else if token.space_before {
                    format!("{} {}", current, token.text)
                } else {
                    format!("{}{}", current, token.text)
                };

                if self.estimate_width(&candidate, font_size) <= max_width {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    wrapped.push(std::mem::take(&mut current));
                }

                if self.estimate_width(&token.text, font_size) <= max_width {
                    current = token.text;
                } else {
                    let mut pieces = self.hard_cut(&token.text, font_size, max_width);
                    current = pieces.pop().unwrap_or_default();
                    wrapped.extend(pieces);
                }
            }

            if !current.is_empty() {
                wrapped.push(current);
            }
        }

        wrapped
    }

    /// Cut an overlong token into marker-terminated pieces plus a final remainder
    fn hard_cut(&self, token: &str, font_size: f64, max_width: f64) -> Vec<String> {
        let marker_width = self.char_width(CONTINUATION_MARKER, font_size);
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut piece_width = 0.0;

        for c in token.chars() {
            let width = self.char_width(c, font_size);
            if !piece.is_empty() && piece_width + width + marker_width > max_width {
                piece.push(CONTINUATION_MARKER);
                pieces.push(std::mem::take(&mut piece));
                piece_width = 0.0;
            }
            piece.push(c);
            piece_width += width;
        }

        pieces.push(piece);
        pieces
    }
}

/// Split a line into space-separated words, with each wide glyph standing alone
fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut word_space_before = false;
    let mut pending_space = false;

    for c in line.chars() {
        if c.is_whitespace() {
            if !word.is_empty() {
                tokens.push(Token {
                    text: std::mem::take(&mut word),
                    space_before: word_space_before,
                });
            }
            pending_space = true;
        } else if is_wide(c) {
            if !word.is_empty() {
                tokens.push(Token {
                    text: std::mem::take(&mut word),
                    space_before: word_space_before,
                });
            }
            tokens.push(Token {
                text: c.to_string(),
                space_before: pending_space,
            });
            pending_space = false;
        } else {
            if word.is_empty() {
                word_space_before = pending_space;
                pending_space = false;
            }
            word.push(c);
        }
    }

    if !word.is_empty() {
        tokens.push(Token {
            text: word,
            space_before: word_space_before,
        });
    }

    tokens
}
