use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::foundation::{
    core::premultiply_rgba8_in_place,
    error::{SlideError, SlideResult},
};

/// Default deadline for reading and decoding a background.
pub const DEFAULT_DECODE_TIMEOUT: Duration = Duration::from_secs(15);

/// Largest edge the raster backend can sample from. Larger decodes are downscaled to fit.
pub const MAX_BACKGROUND_EDGE: u32 = u16::MAX as u32;

/// Where a slide background comes from. One source is shared by every slide in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub enum BackgroundSource {
    /// Image file on disk.
    Path(PathBuf),
    /// `data:image/...;base64,...` URL, as produced by browser image pickers.
    DataUrl(String),
    /// Already-fetched encoded image bytes.
    #[serde(skip)]
    Bytes(Arc<[u8]>),
}

impl BackgroundSource {
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Resolve a relative `Path` source against `root`. Other sources are returned unchanged.
    pub fn resolved_against(&self, root: &Path) -> SlideResult<Self> {
        match self {
            Self::Path(p) if p.is_relative() => {
                let norm = normalize_rel_path(&p.to_string_lossy())?;
                Ok(Self::Path(root.join(norm)))
            }
            other => Ok(other.clone()),
        }
    }

    /// Fetch the encoded bytes without decoding them.
    pub fn read_bytes(&self) -> SlideResult<Arc<[u8]>> {
        match self {
            Self::Path(p) => std::fs::read(p).map(Arc::from).map_err(|e| {
                SlideError::image_load(format!("failed to read '{}': {e}", p.display()))
            }),
            Self::DataUrl(url) => decode_data_url(url).map(Arc::from),
            Self::Bytes(b) => Ok(b.clone()),
        }
    }

    /// Read and decode on the calling thread.
    pub fn load_blocking(&self) -> SlideResult<DecodedBackground> {
        let bytes = self.read_bytes()?;
        decode_background(&bytes)
    }

    /// Read and decode on the blocking pool, bounded by `timeout`.
    #[tracing::instrument(skip(self), fields(source = %self.describe()))]
    pub async fn load(&self, timeout: Duration) -> SlideResult<Arc<DecodedBackground>> {
        let source = self.clone();
        let task = tokio::task::spawn_blocking(move || source.load_blocking());
        await_decode(task, timeout).await
    }

    /// Short human-readable label for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(p) => p.display().to_string(),
            Self::DataUrl(url) => {
                let head = url.split(',').next().unwrap_or_default();
                format!("{head},<{} chars>", url.len())
            }
            Self::Bytes(b) => format!("<{} bytes>", b.len()),
        }
    }
}

async fn await_decode<F>(task: F, timeout: Duration) -> SlideResult<Arc<DecodedBackground>>
where
    F: Future<Output = Result<SlideResult<DecodedBackground>, tokio::task::JoinError>>,
{
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(res)) => res.map(Arc::new),
        Ok(Err(join)) => Err(SlideError::image_load(format!(
            "background decode task failed: {join}"
        ))),
        Err(_) => Err(SlideError::Timeout(timeout)),
    }
}

/// Decoded background, held as a premultiplied pixmap ready to be used as an image paint.
///
/// Cloning is cheap: the pixels are shared, so one decode serves every slide of a batch.
#[derive(Clone)]
pub struct DecodedBackground {
    pub width: u32,
    pub height: u32,
    pixmap: Arc<vello_cpu::Pixmap>,
    /// Content hash of the encoded source bytes.
    pub identity: u64,
}

impl DecodedBackground {
    /// Solid single-pixel background; handy for tests and previews without an image.
    pub fn solid(r: u8, g: u8, b: u8) -> Self {
        let px = [r, g, b, 255];
        Self {
            width: 1,
            height: 1,
            pixmap: Arc::new(premul_pixmap(&px, 1, 1)),
            identity: xxhash_rust::xxh3::xxh3_64(&px),
        }
    }

    /// Premultiplied RGBA8 bytes, row-major, tightly packed.
    pub fn premul_bytes(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Image paint sampling the shared pixmap.
    pub fn paint(&self) -> vello_cpu::Image {
        vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::clone(&self.pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        }
    }
}

impl std::fmt::Debug for DecodedBackground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedBackground")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("identity", &format_args!("{:016x}", self.identity))
            .finish_non_exhaustive()
    }
}

pub fn decode_background(bytes: &[u8]) -> SlideResult<DecodedBackground> {
    if bytes.is_empty() {
        return Err(SlideError::image_load("background image is empty"));
    }
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| SlideError::image_load(format!("decode background: {e}")))?;
    let mut rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(SlideError::image_load("background image has zero area"));
    }

    let (fit_w, fit_h) = fit_within_edge(width, height, MAX_BACKGROUND_EDGE);
    if (fit_w, fit_h) != (width, height) {
        tracing::debug!(width, height, fit_w, fit_h, "downscaling oversized background");
        rgba = image::imageops::resize(&rgba, fit_w, fit_h, image::imageops::FilterType::Triangle);
    }
    let (width, height) = rgba.dimensions();

    let mut raw = rgba.into_raw();
    premultiply_rgba8_in_place(&mut raw);

    Ok(DecodedBackground {
        width,
        height,
        pixmap: Arc::new(premul_pixmap(&raw, width as u16, height as u16)),
        identity: xxhash_rust::xxh3::xxh3_64(bytes),
    })
}

/// Largest size with the same aspect ratio whose edges are all `<= max_edge` (never below 1 px).
pub(crate) fn fit_within_edge(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }
    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled = |v: u32| ((f64::from(v) * scale).round() as u32).clamp(1, max_edge);
    (scaled(width), scaled(height))
}

// Caller guarantees `bytes.len() == w * h * 4`.
fn premul_pixmap(bytes: &[u8], w: u16, h: u16) -> vello_cpu::Pixmap {
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(usize::from(w) * usize::from(h));
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities)
}

fn decode_data_url(url: &str) -> SlideResult<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| SlideError::image_load("data url must start with 'data:'"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| SlideError::image_load("data url has no payload"))?;
    if !header.starts_with("image/") {
        return Err(SlideError::image_load(format!(
            "data url media type '{header}' is not an image"
        )));
    }
    if !header.ends_with(";base64") {
        return Err(SlideError::image_load("only base64 data urls are supported"));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| SlideError::image_load(format!("data url payload: {e}")))
}

/// Normalize and validate a request-relative path.
///
/// Uses `/` separators, drops `.` segments, and rejects parent traversals (`..`).
pub(crate) fn normalize_rel_path(source: &str) -> SlideResult<String> {
    let s = source.replace('\\', "/");
    if s.is_empty() {
        return Err(SlideError::validation("background path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(SlideError::validation(
                "background paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(SlideError::validation(
            "background path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/background.rs"]
mod tests;
