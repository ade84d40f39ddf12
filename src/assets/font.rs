use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::error::{SlideError, SlideResult};

static EMBEDDED_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// Raw font bytes for slide text.
///
/// The embedded default is a bold sans face so output never depends on platform font
/// substitution.
#[derive(Clone)]
pub struct FontFace {
    bytes: Arc<[u8]>,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("len", &self.bytes.len())
            .field("identity", &format_args!("{:016x}", self.identity()))
            .finish()
    }
}

impl Default for FontFace {
    fn default() -> Self {
        Self::embedded()
    }
}

impl FontFace {
    pub fn embedded() -> Self {
        Self {
            bytes: Arc::from(EMBEDDED_BOLD),
        }
    }

    /// Accepts TrueType, OpenType/CFF and collection files.
    pub fn from_bytes(bytes: Vec<u8>) -> SlideResult<Self> {
        let magic = bytes.get(0..4).unwrap_or_default();
        let known = matches!(magic, b"\x00\x01\x00\x00" | b"OTTO" | b"true" | b"ttcf");
        if !known {
            return Err(SlideError::layout("font bytes are not an sfnt font file"));
        }
        Ok(Self {
            bytes: Arc::from(bytes),
        })
    }

    pub fn from_path(path: &Path) -> SlideResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Stable content hash, used to key preview caches.
    pub fn identity(&self) -> u64 {
        xxhash_rust::xxh3::xxh3_64(&self.bytes)
    }
}

/// One shaped glyph run in layout space (origin at the layout's top-left).
pub struct ShapedRun {
    pub font_size: f32,
    pub glyphs: Vec<vello_cpu::Glyph>,
}

/// A single shaped line ready for rasterization.
pub struct ShapedLine {
    pub runs: Vec<ShapedRun>,
    /// Advance width in pixels.
    pub width: f64,
    /// Baseline offset from the top of the layout.
    pub baseline: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl ShapedLine {
    /// Offset from the em-box middle to the alphabetic baseline (canvas `middle` baseline).
    pub fn middle_to_baseline(&self) -> f64 {
        (self.ascent - self.descent) / 2.0
    }
}

/// Stateful helper for shaping single lines with Parley against one registered face.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl TextShaper {
    pub fn new(face: &FontFace) -> SlideResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SlideError::layout("no font families registered from font bytes"))?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SlideError::layout("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.bytes().to_vec()),
            0,
        );

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    pub(crate) fn font_data(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Advance width of `text` laid out on one line.
    pub fn measure(&mut self, text: &str, size_px: f32) -> SlideResult<f64> {
        check_size(size_px)?;
        Ok(self.advance(text, size_px))
    }

    pub fn shape_line(&mut self, text: &str, size_px: f32) -> SlideResult<ShapedLine> {
        check_size(size_px)?;
        let layout = self.build(text, size_px);
        let width = f64::from(layout.width());

        let Some(line) = layout.lines().next() else {
            return Ok(ShapedLine {
                runs: Vec::new(),
                width,
                baseline: 0.0,
                ascent: 0.0,
                descent: 0.0,
            });
        };

        let metrics = line.metrics();
        let mut runs = Vec::new();
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let glyphs = run
                .positioned_glyphs()
                .map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                })
                .collect::<Vec<_>>();
            runs.push(ShapedRun {
                font_size: run.run().font_size(),
                glyphs,
            });
        }

        Ok(ShapedLine {
            runs,
            width,
            baseline: f64::from(metrics.baseline),
            ascent: f64::from(metrics.ascent.abs()),
            descent: f64::from(metrics.descent.abs()),
        })
    }

    pub(crate) fn advance(&mut self, text: &str, size_px: f32) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        f64::from(self.build(text, size_px).width())
    }

    fn build(&mut self, text: &str, size_px: f32) -> parley::Layout<()> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

fn check_size(size_px: f32) -> SlideResult<()> {
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(SlideError::layout("text size_px must be finite and > 0"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
