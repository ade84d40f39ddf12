use crate::{
    foundation::core::Canvas,
    layout::wrap::wrap,
    model::{
        profile::{ProfileSnapshot, TextPosition},
        slide::SlideKind,
    },
};

/// Maximum line width: the 1080 px canvas minus a fixed 100 px total horizontal margin.
pub const MAX_LINE_WIDTH: f64 = 980.0;

pub const ANCHOR_TOP: f64 = 300.0;
pub const ANCHOR_CENTER: f64 = 960.0;
pub const ANCHOR_BOTTOM: f64 = 1620.0;

/// Resolve the y coordinate the text block is centered on.
///
/// Explicit `top`/`bottom` always win. Under `center`, the hook is pinned near the top and the
/// call-to-action near the bottom.
pub fn resolve_anchor(position: TextPosition, kind: SlideKind) -> f64 {
    match (position, kind) {
        (TextPosition::Top, _) => ANCHOR_TOP,
        (TextPosition::Bottom, _) => ANCHOR_BOTTOM,
        (TextPosition::Center, SlideKind::Hook) => ANCHOR_TOP,
        (TextPosition::Center, SlideKind::Cta) => ANCHOR_BOTTOM,
        (TextPosition::Center, SlideKind::Problem | SlideKind::Solution) => ANCHOR_CENTER,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Measured advance width.
    pub width: f64,
    /// Left edge so the line is centered on the canvas midline.
    pub x: f64,
    /// Vertical middle of the line (canvas `middle` baseline).
    pub y_middle: f64,
}

/// Fully resolved text block for one slide.
#[derive(Clone, Debug, PartialEq)]
pub struct TextBlockPlan {
    pub anchor: f64,
    pub line_height: f64,
    pub start_y: f64,
    pub lines: Vec<PlacedLine>,
}

impl TextBlockPlan {
    /// Mean of line middles; the visual center of the drawn block.
    pub fn visual_center_y(&self) -> f64 {
        if self.lines.is_empty() {
            return self.anchor;
        }
        self.lines.iter().map(|l| l.y_middle).sum::<f64>() / self.lines.len() as f64
    }

    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.text.is_empty())
    }
}

/// Wrap and position `text` for a slide of `kind`.
///
/// `measure` must return the advance width of a single line at the profile's font size.
pub fn plan_text_block<F>(
    canvas: Canvas,
    text: &str,
    kind: SlideKind,
    profile: ProfileSnapshot,
    mut measure: F,
) -> TextBlockPlan
where
    F: FnMut(&str) -> f64,
{
    let lines = wrap(text, &mut measure, MAX_LINE_WIDTH);
    let anchor = resolve_anchor(profile.text_position, kind);
    let line_height = profile.line_height();
    let start_y = anchor - (lines.len() as f64 * line_height) / 2.0;
    let center_x = canvas.center_x();

    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let width = if text.is_empty() { 0.0 } else { measure(&text) };
            PlacedLine {
                x: center_x - width / 2.0,
                y_middle: start_y + i as f64 * line_height,
                width,
                text,
            }
        })
        .collect();

    TextBlockPlan {
        anchor,
        line_height,
        start_y,
        lines,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
