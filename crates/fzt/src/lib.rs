#![forbid(unsafe_code)]

//! Fuzzed-text engine public facade.
//!
//! Re-exports the stable surface area from the internal crates and offers
//! a lightweight prelude for day-to-day usage.
//!
//! # Quick start
//!
//! ```ignore
//! use fzt::prelude::*;
//!
//! let mut fonts = FontStore::new();
//! fonts.load("Inter", 1000, include_bytes!("../assets/Inter.ttf"))?;
//!
//! let config = FuzzConfig::new("SYSTEMS CHECK: IN PROGRESS")
//!     .color(PackedRgba::rgb(167, 139, 250))
//!     .base_intensity(0.13)
//!     .hover_intensity(0.5);
//!
//! let mut text = FuzzyText::new(config, Environment::default(), fonts);
//! text.init();
//! // Each display tick: advance to the current time, then present
//! // text.surface() however the embedder draws pixels.
//! text.advance(16.7);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use fzt_core::{
    ColorGradient, Event, Fill, FontFamily, FontSize, FuzzConfig, JitterDirection, PackedRgba,
    PointerEvent, RectF, Viewport, lerp_color,
};

// --- Raster re-exports -----------------------------------------------------

pub use fzt_raster::{
    Face, FontError, FontStore, FontdueFace, PixelBuffer, RasterGlyph, RasterText, TextMetrics,
};

// --- Runtime re-exports ----------------------------------------------------

pub use fzt_runtime::{Environment, FuzzyText, RenderState, Surface};

/// Top-level error type for embedders.
#[derive(Debug)]
pub enum Error {
    /// Font loading or resolution failure.
    Font(FontError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Font(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<FontError> for Error {
    fn from(err: FontError) -> Self {
        Self::Font(err)
    }
}

/// Common imports for embedders.
pub mod prelude {
    pub use crate::{
        Environment, Fill, FontFamily, FontSize, FontStore, FuzzConfig, FuzzyText,
        JitterDirection, PackedRgba, Viewport,
    };
}
