/*!
 * Rendering of overlay plans into ffmpeg filter chains.
 *
 * Values go through two escaping levels: the filter option parser and the
 * filtergraph parser. Text is drawn with `expansion=none` so `%` is literal.
 */

use std::path::PathBuf;

use crate::layout::engine::{FontRole, OverlayElement, OverlayPlan, TextDecoration};

/// Font files used by drawtext, ffmpeg's default font when absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FontSet {
    pub main: Option<PathBuf>,
    pub phonetic: Option<PathBuf>,
}

impl FontSet {
    fn for_role(&self, role: FontRole) -> Option<&PathBuf> {
        match role {
            FontRole::Main => self.main.as_ref(),
            FontRole::Phonetic => self.phonetic.as_ref().or(self.main.as_ref()),
        }
    }
}

/// Escape a value for the filter option parser
fn escape_option_value(raw: &str) -> String {
    raw.replace('\\', r"\\")
        .replace('\'', r"\'")
        .replace(':', r"\:")
}

/// Escape an option-escaped value for embedding in a filtergraph
fn escape_graph_value(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '\'' | '[' | ']' | ',' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape arbitrary text for a drawtext option inside a filtergraph
pub fn escape_drawtext_value(raw: &str) -> String {
    escape_graph_value(&escape_option_value(raw))
}

fn drawbox(x: f64, y: f64, width: f64, height: f64, color: &str) -> String {
    format!(
        "drawbox=x={}:y={}:w={}:h={}:color={}:t=fill",
        x.round() as i64,
        y.round() as i64,
        width.round().max(0.0) as i64,
        height.round().max(0.0) as i64,
        color
    )
}

#[allow(clippy::too_many_arguments)]
fn drawtext(
    text: &str,
    center_x: f64,
    y: f64,
    font_size: u32,
    color: &str,
    font: Option<&PathBuf>,
    decoration: &TextDecoration,
) -> String {
    let mut params = vec![
        format!("text={}", escape_drawtext_value(text)),
        "expansion=none".to_string(),
        format!("fontsize={}", font_size),
        format!("fontcolor={}", color),
        format!("x={}-text_w/2", center_x.round() as i64),
        format!("y={}", y.round() as i64),
    ];

    if let Some(path) = font {
        params.push(format!(
            "fontfile={}",
            escape_drawtext_value(&path.to_string_lossy())
        ));
    }

    match decoration {
        TextDecoration::Plain => {}
        TextDecoration::Border { color, width } => {
            params.push(format!("bordercolor={}", color));
            params.push(format!("borderw={}", width));
        }
        TextDecoration::Shadow { color, offset } => {
            params.push(format!("shadowcolor={}", color));
            params.push(format!("shadowx={}", offset));
            params.push(format!("shadowy={}", offset));
        }
    }

    format!("drawtext={}", params.join(":"))
}

/// Render a plan into a comma-separated filter chain
///
/// An empty plan renders as the `null` pass-through filter.
pub fn render_filter(plan: &OverlayPlan, fonts: &FontSet) -> String {
    let filters: Vec<String> = plan
        .elements
        .iter()
        .map(|element| match element {
            OverlayElement::Fill {
                x,
                y,
                width,
                height,
                color,
            } => drawbox(*x, *y, *width, *height, color),
            OverlayElement::Text {
                text,
                center_x,
                y,
                font_size,
                color,
                font,
                decoration,
            } => drawtext(text, *center_x, *y, *font_size, color, fonts.for_role(*font), decoration),
        })
        .collect();

    if filters.is_empty() {
        "null".to_string()
    } else {
        filters.join(",")
    }
}
