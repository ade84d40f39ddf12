//! Pure text layout: word wrapping and block placement. No rasterization happens here.

pub mod placement;
pub mod wrap;
