#![forbid(unsafe_code)]

//! Rasterization kernel for the fuzzed-text engine.
//!
//! This crate turns a config's text into a [`RasterText`]: a row-major
//! pixel buffer holding the text drawn exactly once, plus the measured
//! bounds the runtime needs for hit-testing and surface sizing. The
//! animation loop upstream never re-renders glyphs; it resamples this
//! buffer row by row.
//!
//! # Role in the stack
//!
//! `fzt-core` supplies config/color types; this crate owns everything
//! font-shaped (the [`Face`] seam, the [`FontStore`] fallback ladder,
//! measurement, glyph placement); `fzt-runtime` consumes the result.

pub mod buffer;
pub mod font;
pub mod text;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use buffer::PixelBuffer;
pub use font::{Face, FontError, FontStore, FontdueFace, RasterGlyph, ResolvedFace};
pub use text::{RasterText, TextMetrics, measure, rasterize};
