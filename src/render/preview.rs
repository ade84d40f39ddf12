use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use xxhash_rust::xxh3::Xxh3;

use crate::{
    assets::{background::DecodedBackground, font::FontFace},
    foundation::error::SlideResult,
    model::{
        profile::{ProfileSnapshot, TextPosition},
        slide::{SlideContent, SlideKind},
    },
    render::compositor::SlideCompositor,
};

const XXH3_SEED: u64 = 0x5f1d_e7a3_c2b4_9e61;
pub const DEFAULT_PREVIEW_CAPACITY: usize = 16;

/// Stable identity of everything that affects one slide's pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PreviewKey {
    pub hi: u64,
    pub lo: u64,
}

impl PreviewKey {
    pub fn compute(
        content: &SlideContent,
        profile: ProfileSnapshot,
        background: &DecodedBackground,
        font: &FontFace,
    ) -> Self {
        let mut h = Xxh3::with_seed(XXH3_SEED);
        h.update(&[kind_tag(content.kind)]);
        h.update(&(content.text.len() as u64).to_le_bytes());
        h.update(content.text.as_bytes());

        let c = profile.text_color;
        h.update(&[c.r, c.g, c.b, c.a]);
        h.update(&profile.font_size_px.to_le_bytes());
        h.update(&[position_tag(profile.text_position)]);
        h.update(&profile.overlay_opacity.to_bits().to_le_bytes());

        h.update(&background.identity.to_le_bytes());
        h.update(&background.width.to_le_bytes());
        h.update(&background.height.to_le_bytes());
        h.update(&font.identity().to_le_bytes());

        let v = h.digest128();
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn kind_tag(kind: SlideKind) -> u8 {
    match kind {
        SlideKind::Hook => 0,
        SlideKind::Problem => 1,
        SlideKind::Solution => 2,
        SlideKind::Cta => 3,
    }
}

fn position_tag(p: TextPosition) -> u8 {
    match p {
        TextPosition::Top => 0,
        TextPosition::Center => 1,
        TextPosition::Bottom => 2,
    }
}

/// Renders single slides for live preview, reusing PNGs whose inputs have not changed.
///
/// Eviction is oldest-inserted first once `capacity` entries are held.
pub struct PreviewCache {
    font: FontFace,
    compositor: SlideCompositor,
    capacity: usize,
    entries: HashMap<PreviewKey, Arc<[u8]>>,
    order: VecDeque<PreviewKey>,
    hits: u64,
    misses: u64,
}

impl PreviewCache {
    pub fn new(font: FontFace, capacity: usize) -> SlideResult<Self> {
        let compositor = SlideCompositor::new(&font)?;
        Ok(Self {
            font,
            compositor,
            capacity: capacity.max(1),
            entries: HashMap::new(),
            order: VecDeque::new(),
            hits: 0,
            misses: 0,
        })
    }

    pub fn render(
        &mut self,
        background: &DecodedBackground,
        content: &SlideContent,
        profile: ProfileSnapshot,
    ) -> SlideResult<Arc<[u8]>> {
        let key = PreviewKey::compute(content, profile, background, &self.font);
        if let Some(png) = self.entries.get(&key) {
            self.hits += 1;
            return Ok(png.clone());
        }

        self.misses += 1;
        tracing::debug!(kind = %content.kind, "preview cache miss");
        let png: Arc<[u8]> = self.compositor.render(background, content, profile)?.into();

        while self.entries.len() >= self.capacity {
            let Some(old) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&old);
        }
        self.entries.insert(key, png.clone());
        self.order.push_back(key);
        Ok(png)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since construction.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
