//! End-to-end story rendering: request → decoded background → PNGs → archive.

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    assets::{background::BackgroundSource, font::FontFace},
    foundation::error::{SlideError, SlideResult},
    model::{profile::CustomizationProfile, slide::Story},
    package::{
        archive::{Archive, DEFAULT_ARCHIVE_NAME, NamingScheme},
        zip::Compression,
    },
    render::{
        batch::{BatchOptions, RenderedSlide, render_decoded_async},
        cancel::RenderGeneration,
        preview::PreviewCache,
    },
};

/// JSON description of one story render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoryRequest {
    pub background: BackgroundSource,
    #[serde(default)]
    pub profile: CustomizationProfile,
    pub slides: Story,
    #[serde(default)]
    pub naming: NamingScheme,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_name: Option<String>,
    #[serde(default)]
    pub parallel: bool,
}

impl StoryRequest {
    pub fn from_json_str(s: &str) -> SlideResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| SlideError::validation(format!("story request: {e}")))
    }

    /// Load a request file. Relative background paths resolve against the file's directory.
    pub fn from_path(path: &Path) -> SlideResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read story request '{}'", path.display()))?;
        let mut req = Self::from_json_str(&text)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        req.background = req.background.resolved_against(root)?;
        Ok(req)
    }

    pub fn archive_name(&self) -> &str {
        self.archive_name.as_deref().unwrap_or(DEFAULT_ARCHIVE_NAME)
    }
}

/// Library-side knobs that are not part of the request document.
#[derive(Clone, Debug)]
pub struct RenderOpts {
    pub font: FontFace,
    pub decode_timeout: Duration,
    /// Forces parallel rendering on; `false` defers to the request.
    pub parallel: bool,
    pub threads: Option<usize>,
    /// Overrides the request's naming scheme when set.
    pub naming: Option<NamingScheme>,
    pub compression: Compression,
}

impl Default for RenderOpts {
    fn default() -> Self {
        let batch = BatchOptions::default();
        Self {
            font: FontFace::default(),
            decode_timeout: batch.decode_timeout,
            parallel: batch.parallel,
            threads: batch.threads,
            naming: None,
            compression: Compression::default(),
        }
    }
}

/// Result of a successful story render.
#[derive(Clone, Debug)]
pub struct StoryOutput {
    pub rendered: Vec<RenderedSlide>,
    pub archive: Archive,
    pub archive_name: String,
    pub zip: Vec<u8>,
}

/// Long-lived renderer. Starting a render supersedes any render still in flight on the same
/// session.
#[derive(Clone, Debug, Default)]
pub struct Session {
    opts: RenderOpts,
    generation: RenderGeneration,
}

impl Session {
    pub fn new(opts: RenderOpts) -> Self {
        Self {
            opts,
            generation: RenderGeneration::new(),
        }
    }

    pub fn opts(&self) -> &RenderOpts {
        &self.opts
    }

    pub fn generation(&self) -> &RenderGeneration {
        &self.generation
    }

    #[tracing::instrument(skip_all, fields(background = %req.background.describe()))]
    pub async fn render(&self, req: &StoryRequest) -> SlideResult<StoryOutput> {
        let ticket = self.generation.begin();
        let snapshot = req.profile.snapshot()?;
        let batch = BatchOptions {
            parallel: self.opts.parallel || req.parallel,
            threads: self.opts.threads,
            decode_timeout: self.opts.decode_timeout,
        };

        let background = req.background.load(batch.decode_timeout).await?;
        ticket.check()?;
        let rendered = render_decoded_async(
            &self.opts.font,
            background,
            req.slides.slides(),
            snapshot,
            &batch,
            &ticket,
        )
        .await?;

        let naming = self.opts.naming.unwrap_or(req.naming);
        let archive = Archive::pack(&rendered, naming)?;
        let zip = archive.to_zip_bytes(self.opts.compression)?;
        ticket.check()?;

        Ok(StoryOutput {
            rendered,
            archive,
            archive_name: req.archive_name().to_owned(),
            zip,
        })
    }

    /// Render slide `index` of `req` through `cache`.
    pub async fn preview(
        &self,
        req: &StoryRequest,
        index: usize,
        cache: &mut PreviewCache,
    ) -> SlideResult<Arc<[u8]>> {
        let content = req.slides.slides().get(index).ok_or_else(|| {
            SlideError::validation(format!(
                "slide index {index} out of range (story has {})",
                Story::LEN
            ))
        })?;
        let snapshot = req.profile.snapshot()?;
        let background = req.background.load(self.opts.decode_timeout).await?;
        cache.render(&background, content, snapshot)
    }
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
