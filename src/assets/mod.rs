//! Inputs shared by every slide of a batch: background image, text color, font face.

/// Background sources and decoding.
pub mod background;
/// Text color parsing and presets.
pub mod color;
/// Font loading and single-line shaping.
pub mod font;
