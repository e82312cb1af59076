#![forbid(unsafe_code)]

//! Deterministic synthetic font face for tests.
//!
//! [`BlockFace`] renders every non-whitespace character as a solid
//! full-coverage block with fixed, px-proportional metrics, so downstream
//! tests can assert exact buffer dimensions and pixel values without
//! shipping font binaries.

use crate::font::{Face, RasterGlyph};

/// Synthetic face: fixed-advance solid blocks.
///
/// Metrics at size `px`: advance `0.6 px`, block `0.5 px` wide by
/// `0.7 px` tall sitting on the baseline, ascent `0.8 px`, descent
/// `0.25 px`. Kerning and line metrics are configurable so tests can
/// exercise both measurement paths and the heuristic-metrics fallback.
#[derive(Debug, Clone, Copy)]
pub struct BlockFace {
    kern: f32,
    line_metrics: bool,
}

impl BlockFace {
    /// Face with no kerning and real line metrics.
    pub fn new() -> Self {
        Self {
            kern: 0.0,
            line_metrics: true,
        }
    }

    /// Apply a uniform kerning adjustment (in ems) between every pair.
    pub fn with_kern(mut self, em: f32) -> Self {
        self.kern = em;
        self
    }

    /// Pretend the face carries no horizontal line metrics, forcing the
    /// measurement heuristics.
    pub fn without_line_metrics(mut self) -> Self {
        self.line_metrics = false;
        self
    }
}

impl Default for BlockFace {
    fn default() -> Self {
        Self::new()
    }
}

impl Face for BlockFace {
    fn advance(&self, _ch: char, px: f32) -> f32 {
        px * 0.6
    }

    fn kern(&self, _left: char, _right: char, px: f32) -> Option<f32> {
        if self.kern != 0.0 {
            Some(self.kern * px)
        } else {
            None
        }
    }

    fn line_metrics(&self, px: f32) -> Option<(f32, f32)> {
        if self.line_metrics {
            Some((px * 0.8, px * 0.25))
        } else {
            None
        }
    }

    fn rasterize(&self, ch: char, px: f32) -> RasterGlyph {
        if ch.is_whitespace() {
            return RasterGlyph {
                width: 0,
                height: 0,
                xmin: 0,
                ymin: 0,
                coverage: Vec::new(),
            };
        }
        let width = (px * 0.5).round().max(1.0) as usize;
        let height = (px * 0.7).round().max(1.0) as usize;
        RasterGlyph {
            width,
            height,
            xmin: 0,
            ymin: 0,
            coverage: vec![255; width * height],
        }
    }
}
