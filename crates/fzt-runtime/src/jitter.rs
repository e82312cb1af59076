#![forbid(unsafe_code)]

//! Per-row jitter offsets and compositing.
//!
//! Each one-pixel-tall row of the raster buffer gets an independent random
//! offset pair drawn fresh every committed frame:
//!
//! - `dx` uniform in `[-0.5, 0.5] * fuzz_range * intensity` (zero when the
//!   direction is vertical-only)
//! - `dy` uniform in `[-0.5, 0.5] * fuzz_range * 0.5 * intensity` (zero
//!   when the direction is horizontal-only)
//!
//! Independent per-row draws are what make the text look fuzzy instead of
//! shaking as a block. Offsets stay fractional in the table and round to
//! the nearest pixel at blit time.
//!
//! Uses xorshift32 with a caller-suppliable seed for reproducible frames.

use fzt_core::JitterDirection;
use fzt_raster::RasterText;

use crate::surface::Surface;

#[inline]
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}

/// Uniform draw in `[0, 1)` from the high bits.
#[inline]
fn unit(state: &mut u32) -> f32 {
    (xorshift32(state) >> 8) as f32 / 16_777_216.0
}

/// Seedable per-row offset table, reused across frames.
#[derive(Debug, Clone)]
pub struct RowJitter {
    rng: u32,
    offsets: Vec<(f32, f32)>,
}

impl RowJitter {
    /// Jitter source with the default seed.
    pub fn new() -> Self {
        Self::with_seed(0xF0CC_1A5E)
    }

    /// Jitter source with a specific seed for deterministic frames.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            // Zero is a fixed point of xorshift; force a set bit.
            rng: seed | 1,
            offsets: Vec::new(),
        }
    }

    /// Draw fresh independent offsets for `rows` rows.
    pub fn regenerate(
        &mut self,
        rows: usize,
        fuzz_range: f32,
        intensity: f32,
        direction: JitterDirection,
    ) {
        self.offsets.clear();
        self.offsets.reserve(rows);
        for _ in 0..rows {
            let dx = if direction.horizontal() {
                (unit(&mut self.rng) - 0.5) * fuzz_range * intensity
            } else {
                0.0
            };
            let dy = if direction.vertical() {
                (unit(&mut self.rng) - 0.5) * fuzz_range * 0.5 * intensity
            } else {
                0.0
            };
            self.offsets.push((dx, dy));
        }
    }

    /// The current `(dx, dy)` table, one entry per row.
    #[inline]
    pub fn offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }
}

impl Default for RowJitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Clear the surface and draw every raster row at its jittered position.
pub fn composite(raster: &RasterText, offsets: &[(f32, f32)], surface: &mut Surface) {
    surface.clear();
    let rows = raster.buffer.height();
    for y in 0..rows {
        let (dx, dy) = offsets.get(y as usize).copied().unwrap_or((0.0, 0.0));
        let Some(row) = raster.buffer.row(y) else {
            break;
        };
        let dest_y = (y as f32 + dy).round() as i64;
        surface.blit_row(row, dx.round() as i64, dest_y);
    }
}
