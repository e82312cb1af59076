#![forbid(unsafe_code)]

//! The visible pixel surface.
//!
//! Sized to the raster buffer plus symmetric jitter margins; the margins
//! are always at least the fuzz range on every jittered axis, so no row
//! offset can push content off-surface. Blitting is translated by the
//! margins and clipped, never panicking on out-of-range offsets.

use fzt_core::{PackedRgba, RectF};
use fzt_raster::PixelBuffer;

/// Visible surface: content area plus jitter margins.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    buffer: PixelBuffer,
    margin_x: u32,
    margin_y: u32,
}

impl Surface {
    /// Create a cleared surface around a `content_width` by
    /// `content_height` area with the given margins on each side.
    pub fn new(content_width: u32, content_height: u32, margin_x: u32, margin_y: u32) -> Self {
        Self {
            buffer: PixelBuffer::new(
                content_width + margin_x * 2,
                content_height + margin_y * 2,
            ),
            margin_x,
            margin_y,
        }
    }

    /// Total surface width, margins included.
    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Total surface height, margins included.
    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Horizontal jitter margin.
    #[inline]
    pub const fn margin_x(&self) -> u32 {
        self.margin_x
    }

    /// Vertical jitter margin.
    #[inline]
    pub const fn margin_y(&self) -> u32 {
        self.margin_y
    }

    /// The composited pixels.
    #[inline]
    pub fn pixels(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The margin-offset rectangle of a `width` by `height` box in
    /// content space: the pointer hit box for the measured text.
    pub fn content_rect(&self, width: u32, height: u32) -> RectF {
        RectF::new(
            self.margin_x as f32,
            self.margin_y as f32,
            width as f32,
            height as f32,
        )
    }

    /// Clear the whole surface, margins included.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Blend one source row at content-local position `(dx, y)`.
    ///
    /// The destination is translated by the margins and clipped to the
    /// surface; fully transparent source pixels are skipped.
    pub fn blit_row(&mut self, row: &[PackedRgba], dx: i64, y: i64) {
        let dest_y = self.margin_y as i64 + y;
        if dest_y < 0 || dest_y >= self.buffer.height() as i64 {
            return;
        }
        let width = self.buffer.width() as i64;
        for (i, &px) in row.iter().enumerate() {
            if px.a() == 0 {
                continue;
            }
            let dest_x = self.margin_x as i64 + dx + i as i64;
            if dest_x < 0 || dest_x >= width {
                continue;
            }
            self.buffer.blend(dest_x as u32, dest_y as u32, px);
        }
    }
}
