use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{SlideError, SlideResult},
    model::slide::SlideKind,
    package::zip::{Compression, ZipWriter},
    render::batch::RenderedSlide,
};

/// Suggested download name for a packed story.
pub const DEFAULT_ARCHIVE_NAME: &str = "viral-tiktok-slides.zip";

/// Entry base names by output position.
pub const POSITIONAL_NAMES: [&str; 4] = [
    "hook-slide",
    "problem-slide",
    "solution-slide",
    "cta-slide",
];

/// How archive entries are named.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// Name by output position, whatever kind the slide actually is.
    #[default]
    Positional,
    /// Name by each slide's own kind; duplicate kinds are rejected.
    ByType,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub source_type: SlideKind,
    pub png: Vec<u8>,
}

/// Named PNG entries ready to be written as a single-level ZIP.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Archive {
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    #[tracing::instrument(skip(rendered), fields(slides = rendered.len()))]
    pub fn pack(rendered: &[RenderedSlide], naming: NamingScheme) -> SlideResult<Self> {
        let entries = match naming {
            NamingScheme::Positional => pack_positional(rendered)?,
            NamingScheme::ByType => pack_by_type(rendered)?,
        };
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_zip_bytes(&self, compression: Compression) -> SlideResult<Vec<u8>> {
        let mut w = ZipWriter::new();
        for e in &self.entries {
            w.add_entry(&e.name, &e.png, compression)?;
        }
        w.finish()
    }
}

fn pack_positional(rendered: &[RenderedSlide]) -> SlideResult<Vec<ArchiveEntry>> {
    if rendered.len() > POSITIONAL_NAMES.len() {
        return Err(SlideError::archive(format!(
            "positional naming supports at most {} slides, got {}",
            POSITIONAL_NAMES.len(),
            rendered.len()
        )));
    }

    let canonical = rendered
        .iter()
        .zip(SlideKind::CANONICAL)
        .all(|(r, k)| r.source_type == k);
    if !canonical {
        tracing::warn!(
            kinds = ?rendered.iter().map(|r| r.source_type).collect::<Vec<_>>(),
            "slides are not in hook/problem/solution/cta order; names follow position"
        );
    }

    Ok(rendered
        .iter()
        .zip(POSITIONAL_NAMES)
        .map(|(r, base)| ArchiveEntry {
            name: format!("{base}.png"),
            source_type: r.source_type,
            png: r.png.clone(),
        })
        .collect())
}

fn pack_by_type(rendered: &[RenderedSlide]) -> SlideResult<Vec<ArchiveEntry>> {
    let mut out = Vec::<ArchiveEntry>::with_capacity(rendered.len());
    for r in rendered {
        if out.iter().any(|e| e.source_type == r.source_type) {
            return Err(SlideError::archive(format!(
                "more than one '{}' slide; type naming needs unique kinds",
                r.source_type
            )));
        }
        out.push(ArchiveEntry {
            name: format!("{}.png", r.source_type.base_filename()),
            source_type: r.source_type,
            png: r.png.clone(),
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/package/archive.rs"]
mod tests;
