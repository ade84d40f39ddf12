//! Rasterization and batch scheduling.

/// Multi-slide rendering, sequential or on a rayon pool.
pub mod batch;
pub(crate) mod blend;
pub(crate) mod blur;
/// Request generation counter for superseding in-flight renders.
pub mod cancel;
/// Single-slide compositor.
pub mod compositor;
/// PNG encoding of premultiplied rasters.
pub mod png;
/// Fingerprint-keyed single-slide preview cache.
pub mod preview;
