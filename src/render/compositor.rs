//! Single-slide rasterization.
//!
//! Layer order is fixed: cover-fit background, black overlay, blurred drop shadow, text fill.
//! Every call owns fresh pixmaps that are dropped once the PNG is encoded.

use crate::{
    assets::{
        background::DecodedBackground,
        font::{FontFace, ShapedLine, TextShaper},
    },
    foundation::{
        core::{Canvas, Rgba8},
        error::{SlideError, SlideResult},
    },
    layout::placement::{TextBlockPlan, plan_text_block},
    model::{profile::ProfileSnapshot, slide::SlideContent},
    render::{
        blend::over_in_place,
        blur::{blur_occupied_rows_in_place, shadow_blur_params},
        png::encode_png_premul,
    },
};

/// Fixed legibility shadow: rgba(0,0,0,0.8), blur 4 px, offset (2,2). Independent of text hue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextShadow {
    pub color: Rgba8,
    pub blur_px: f32,
    pub offset: (f64, f64),
}

impl TextShadow {
    /// Shadow color for text filled with `fill`: the shadow alpha scales with the fill alpha.
    pub fn color_for(self, fill: Rgba8) -> Rgba8 {
        let a = (u16::from(self.color.a) * u16::from(fill.a) + 127) / 255;
        Rgba8::new(self.color.r, self.color.g, self.color.b, a as u8)
    }
}

pub const TEXT_SHADOW: TextShadow = TextShadow {
    color: Rgba8::new(0, 0, 0, 204),
    blur_px: 4.0,
    offset: (2.0, 2.0),
};

/// Cover-fit placement of an image onto the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoverFit {
    pub scale: f64,
    /// May be negative: the overflow is cropped symmetrically.
    pub offset_x: f64,
    pub offset_y: f64,
}

impl CoverFit {
    pub fn compute(canvas: Canvas, img_w: u32, img_h: u32) -> SlideResult<Self> {
        if img_w == 0 || img_h == 0 {
            return Err(SlideError::image_load("background image has zero area"));
        }
        let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
        let (iw, ih) = (f64::from(img_w), f64::from(img_h));
        let scale = (cw / iw).max(ch / ih);
        Ok(Self {
            scale,
            offset_x: (cw - iw * scale) / 2.0,
            offset_y: (ch - ih * scale) / 2.0,
        })
    }

    pub fn affine(self) -> vello_cpu::kurbo::Affine {
        vello_cpu::kurbo::Affine::translate((self.offset_x, self.offset_y))
            * vello_cpu::kurbo::Affine::scale(self.scale)
    }
}

/// Fully composited slide, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct SlideRaster {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl SlideRaster {
    pub fn to_png(&self) -> SlideResult<Vec<u8>> {
        encode_png_premul(&self.data, self.width, self.height)
    }
}

/// Renders slides onto the fixed story canvas.
///
/// Holds a text shaper for one font face; everything else is scoped to a single call.
pub struct SlideCompositor {
    canvas: Canvas,
    shaper: TextShaper,
}

impl SlideCompositor {
    pub fn new(font: &FontFace) -> SlideResult<Self> {
        Ok(Self {
            canvas: Canvas::STORY,
            shaper: TextShaper::new(font)?,
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Wrap and position the slide's text without rasterizing anything.
    pub fn plan(&mut self, content: &SlideContent, profile: ProfileSnapshot) -> TextBlockPlan {
        let size = profile.font_size_px as f32;
        let shaper = &mut self.shaper;
        plan_text_block(
            self.canvas,
            &content.text,
            content.kind,
            profile,
            |line| shaper.advance(line, size),
        )
    }

    /// Render one slide and encode it as PNG.
    #[tracing::instrument(skip_all, fields(kind = %content.kind))]
    pub fn render(
        &mut self,
        background: &DecodedBackground,
        content: &SlideContent,
        profile: ProfileSnapshot,
    ) -> SlideResult<Vec<u8>> {
        let raster = self.render_raster(background, content, profile)?;
        raster.to_png()
    }

    pub fn render_raster(
        &mut self,
        background: &DecodedBackground,
        content: &SlideContent,
        profile: ProfileSnapshot,
    ) -> SlideResult<SlideRaster> {
        let (w, h) = self.canvas.dims_u16()?;
        let plan = self.plan(content, profile);
        tracing::debug!(
            lines = plan.lines.len(),
            anchor = plan.anchor,
            start_y = plan.start_y,
            "text block planned"
        );

        let size = profile.font_size_px as f32;
        let mut shaped = Vec::with_capacity(plan.lines.len());
        for line in &plan.lines {
            if line.text.is_empty() {
                continue;
            }
            let s = self.shaper.shape_line(&line.text, size)?;
            let dx = line.x;
            let dy = line.y_middle + s.middle_to_baseline() - s.baseline;
            shaped.push((s, dx, dy));
        }

        let mut base = vello_cpu::Pixmap::new(w, h);
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        // Background + overlay.
        let fit = CoverFit::compute(self.canvas, background.width, background.height)?;
        ctx.set_transform(fit.affine());
        ctx.set_paint(background.paint());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(background.width),
            f64::from(background.height),
        ));

        let overlay = Rgba8::black_alpha(profile.overlay_opacity);
        if overlay.a > 0 {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(to_color(overlay));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut base);

        if !shaped.is_empty() {
            let shadow_color = TEXT_SHADOW.color_for(profile.text_color);
            if shadow_color.a > 0 {
                // Shadow layer, blurred on its own before compositing.
                let mut shadow = vello_cpu::Pixmap::new(w, h);
                ctx.reset();
                draw_lines(
                    &mut ctx,
                    self.shaper.font_data(),
                    &shaped,
                    shadow_color,
                    TEXT_SHADOW.offset,
                );
                ctx.flush();
                ctx.render_to_pixmap(&mut shadow);
                let (radius, sigma) = shadow_blur_params(TEXT_SHADOW.blur_px);
                blur_occupied_rows_in_place(
                    shadow.data_as_u8_slice_mut(),
                    u32::from(w),
                    u32::from(h),
                    radius,
                    sigma,
                )?;
                over_in_place(
                    base.data_as_u8_slice_mut(),
                    shadow.data_as_u8_slice(),
                    1.0,
                )?;
            }

            let mut text = vello_cpu::Pixmap::new(w, h);
            ctx.reset();
            draw_lines(
                &mut ctx,
                self.shaper.font_data(),
                &shaped,
                profile.text_color,
                (0.0, 0.0),
            );
            ctx.flush();
            ctx.render_to_pixmap(&mut text);
            over_in_place(base.data_as_u8_slice_mut(), text.data_as_u8_slice(), 1.0)?;
        }

        Ok(SlideRaster {
            width: u32::from(w),
            height: u32::from(h),
            data: base.data_as_u8_slice().to_vec(),
        })
    }
}

fn draw_lines(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    lines: &[(ShapedLine, f64, f64)],
    color: Rgba8,
    offset: (f64, f64),
) {
    ctx.set_paint(to_color(color));
    for (line, dx, dy) in lines {
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            dx + offset.0,
            dy + offset.1,
        )));
        for run in &line.runs {
            let glyphs = run.glyphs.iter().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        }
    }
}

fn to_color(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
