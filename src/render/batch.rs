use std::{sync::Arc, time::Duration};

use rayon::prelude::*;

use crate::{
    assets::{
        background::{BackgroundSource, DEFAULT_DECODE_TIMEOUT, DecodedBackground},
        font::FontFace,
    },
    foundation::error::{SlideError, SlideResult},
    model::{
        profile::{CustomizationProfile, ProfileSnapshot},
        slide::{SlideContent, SlideKind},
    },
    render::{cancel::RenderTicket, compositor::SlideCompositor},
};

/// Encoded output of one slide.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSlide {
    /// Position in the input sequence.
    pub index: usize,
    /// Kind of the slide this image was rendered from.
    pub source_type: SlideKind,
    pub png: Vec<u8>,
}

/// Scheduling controls for a batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOptions {
    /// Render slides on a rayon pool when `true`. Output order is positional either way.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
    /// Deadline for reading and decoding the background.
    pub decode_timeout: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            decode_timeout: DEFAULT_DECODE_TIMEOUT,
        }
    }
}

/// Render every slide against an already decoded background.
///
/// `output[i]` is rendered from `slides[i]`. The first failing slide fails the whole batch.
pub fn render_all(
    font: &FontFace,
    background: &DecodedBackground,
    slides: &[SlideContent],
    profile: &CustomizationProfile,
    opts: &BatchOptions,
) -> SlideResult<Vec<RenderedSlide>> {
    let snapshot = profile.snapshot()?;
    render_all_snapshot(font, background, slides, snapshot, opts, None)
}

/// Like [`render_all`] but with a frozen profile and an optional ticket checked between slides.
#[tracing::instrument(skip_all, fields(slides = slides.len(), parallel = opts.parallel))]
pub fn render_all_snapshot(
    font: &FontFace,
    background: &DecodedBackground,
    slides: &[SlideContent],
    profile: ProfileSnapshot,
    opts: &BatchOptions,
    ticket: Option<&RenderTicket>,
) -> SlideResult<Vec<RenderedSlide>> {
    let check = || ticket.map_or(Ok(()), RenderTicket::check);

    if !opts.parallel || slides.len() < 2 {
        let mut comp = SlideCompositor::new(font)?;
        let mut out = Vec::with_capacity(slides.len());
        for (index, content) in slides.iter().enumerate() {
            check()?;
            let png = comp.render(background, content, profile)?;
            out.push(RenderedSlide {
                index,
                source_type: content.kind,
                png,
            });
        }
        check()?;
        return Ok(out);
    }

    let pool = build_thread_pool(opts.threads)?;
    let rendered = pool.install(|| {
        slides
            .par_iter()
            .enumerate()
            .map_init(
                || SlideCompositor::new(font),
                |comp, (index, content)| -> SlideResult<RenderedSlide> {
                    check()?;
                    let comp = comp.as_mut().map_err(|e| {
                        SlideError::layout(format!("compositor init failed: {e}"))
                    })?;
                    let png = comp.render(background, content, profile)?;
                    Ok(RenderedSlide {
                        index,
                        source_type: content.kind,
                        png,
                    })
                },
            )
            .collect::<Vec<_>>()
    });

    let mut out = Vec::with_capacity(rendered.len());
    for item in rendered {
        out.push(item?);
    }
    check()?;
    Ok(out)
}

/// Decode `background` and render every slide, abandoning the work if `ticket` is superseded.
///
/// The profile is snapshotted before the decode starts, so edits made while the batch is in
/// flight only affect the next request.
#[tracing::instrument(skip_all, fields(generation = ticket.generation(), slides = slides.len()))]
pub async fn render_all_async(
    font: &FontFace,
    background: &BackgroundSource,
    slides: &[SlideContent],
    profile: &CustomizationProfile,
    opts: &BatchOptions,
    ticket: &RenderTicket,
) -> SlideResult<Vec<RenderedSlide>> {
    let snapshot = profile.snapshot()?;
    let decoded = background.load(opts.decode_timeout).await?;
    ticket.check()?;
    render_decoded_async(font, decoded, slides, snapshot, opts, ticket).await
}

/// Render on the blocking pool with an already decoded, shared background.
pub async fn render_decoded_async(
    font: &FontFace,
    background: Arc<DecodedBackground>,
    slides: &[SlideContent],
    profile: ProfileSnapshot,
    opts: &BatchOptions,
    ticket: &RenderTicket,
) -> SlideResult<Vec<RenderedSlide>> {
    let font = font.clone();
    let slides = slides.to_vec();
    let opts = opts.clone();
    let worker_ticket = ticket.clone();
    let task = tokio::task::spawn_blocking(move || {
        render_all_snapshot(
            &font,
            &background,
            &slides,
            profile,
            &opts,
            Some(&worker_ticket),
        )
    });

    let res = task
        .await
        .map_err(|e| SlideError::layout(format!("render task failed: {e}")))?;
    if let Err(err @ SlideError::Superseded { .. }) = &res {
        tracing::warn!(%err, "discarding stale render");
    }
    res
}

fn build_thread_pool(threads: Option<usize>) -> SlideResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(SlideError::validation(
            "render threads must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| SlideError::layout(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/batch.rs"]
mod tests;
