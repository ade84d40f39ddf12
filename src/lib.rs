//! slidekit renders four-slide vertical story sets (hook, problem, solution, call to action)
//! onto a shared background and packs them into a single archive.
//!
//! The pipeline is:
//!
//! - Parse a [`StoryRequest`] (or build [`Story`] + [`CustomizationProfile`] directly)
//! - Decode the background once ([`BackgroundSource::load`])
//! - Render every slide to a 1080×1920 PNG ([`render_all`])
//! - Name and zip the results ([`Archive`]) and hand them to an [`ArchiveSink`]
#![forbid(unsafe_code)]

pub mod assets;
pub mod foundation;
pub mod layout;
pub mod model;
pub mod package;
pub mod render;
/// End-to-end story rendering.
pub mod session;

pub use crate::assets::background::{BackgroundSource, DecodedBackground};
pub use crate::assets::color::TextColor;
pub use crate::assets::font::FontFace;
pub use crate::foundation::core::{Canvas, Rgba8};
pub use crate::foundation::error::{SlideError, SlideResult};
pub use crate::layout::wrap::wrap;
pub use crate::model::profile::{CustomizationProfile, ProfileSnapshot, TextPosition};
pub use crate::model::slide::{SlideContent, SlideKind, Story};
pub use crate::package::archive::{Archive, DEFAULT_ARCHIVE_NAME, NamingScheme};
pub use crate::package::sink::{
    ArchiveSink, FileSink, InMemorySink, save_detached, save_detached_on,
};
pub use crate::render::batch::{BatchOptions, RenderedSlide, render_all, render_all_async};
pub use crate::render::cancel::{RenderGeneration, RenderTicket};
pub use crate::render::compositor::SlideCompositor;
pub use crate::render::preview::PreviewCache;
pub use crate::session::{RenderOpts, Session, StoryOutput, StoryRequest};
