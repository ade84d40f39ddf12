//! Packaging rendered slides into a downloadable archive.

/// Slide naming and archive assembly.
pub mod archive;
/// Archive destinations.
pub mod sink;
/// ZIP container encoding.
pub mod zip;
