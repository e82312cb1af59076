#![forbid(unsafe_code)]

//! Text measurement and one-shot rasterization.
//!
//! Two measurement paths, matching the two drawing paths:
//!
//! - letter spacing == 0: the string is measured and drawn in one pass,
//!   with pair kerning applied;
//! - letter spacing != 0: each character is measured and drawn
//!   independently, advancing by its own advance plus the spacing (no
//!   spacing after the final character, no kerning).
//!
//! The buffer is padded 20 px horizontally and the text drawn at a 10 px
//! left inset with alphabetic baseline positioning, so sub-pixel rounding
//! and stroke overhang never clip. Gradient fills are sampled per
//! destination column across the full padded width.

use fzt_core::Fill;

use crate::buffer::PixelBuffer;
use crate::font::Face;

/// Horizontal padding added to the measured width.
pub const WIDTH_PAD: u32 = 20;

/// Left inset where the pen starts.
pub const DRAW_INSET: f32 = 10.0;

/// Fraction of the font size assumed as descent when the face carries no
/// line metrics.
const DESCENT_HEURISTIC: f32 = 0.25;

/// Measured text extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Total advance width, spacing included.
    pub total_width: f32,
    /// Baseline to top.
    pub ascent: f32,
    /// Baseline to bottom, positive.
    pub descent: f32,
}

/// The rasterized text: pixel buffer plus the measured bounds the runtime
/// needs for surface sizing and hit-testing.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterText {
    /// The one-time-drawn source image (`text_width + 20` by
    /// `text_height` pixels).
    pub buffer: PixelBuffer,
    /// Measured advance width, rounded up.
    pub text_width: u32,
    /// Measured ascent + descent, rounded up.
    pub text_height: u32,
    /// Baseline offset from the buffer top.
    pub ascent: f32,
}

/// `(ascent, descent)` from the face, or the size-proportional heuristics
/// when the face carries no line metrics.
fn vertical_metrics(face: &dyn Face, px: f32) -> (f32, f32) {
    face.line_metrics(px)
        .unwrap_or((px, px * DESCENT_HEURISTIC))
}

/// Measure `text` at `px` pixels with the given letter spacing.
pub fn measure(face: &dyn Face, text: &str, px: f32, letter_spacing: f32) -> TextMetrics {
    let (ascent, descent) = vertical_metrics(face, px);

    let total_width = if letter_spacing != 0.0 {
        let mut width = 0.0;
        let mut count = 0usize;
        for ch in text.chars() {
            width += face.advance(ch, px) + letter_spacing;
            count += 1;
        }
        if count > 0 {
            // Spacing goes between characters, not after the last one.
            width - letter_spacing
        } else {
            0.0
        }
    } else {
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                width += face.kern(p, ch, px).unwrap_or(0.0);
            }
            width += face.advance(ch, px);
            prev = Some(ch);
        }
        width
    };

    TextMetrics {
        total_width,
        ascent,
        descent,
    }
}

/// Rasterize `text` once into a padded buffer.
///
/// Returns `None` when the measured bounds are degenerate (empty text, or
/// a face reporting zero extents): the caller renders nothing.
pub fn rasterize(
    face: &dyn Face,
    text: &str,
    px: f32,
    letter_spacing: f32,
    fill: &Fill,
) -> Option<RasterText> {
    let metrics = measure(face, text, px, letter_spacing);

    let text_width = metrics.total_width.max(0.0).ceil() as u32;
    let text_height = (metrics.ascent + metrics.descent).max(0.0).ceil() as u32;
    if text_width == 0 || text_height == 0 {
        return None;
    }

    let mut buffer = PixelBuffer::new(text_width + WIDTH_PAD, text_height);

    let mut pen = DRAW_INSET;
    if letter_spacing != 0.0 {
        for ch in text.chars() {
            draw_glyph(&mut buffer, face, ch, px, pen, metrics.ascent, fill);
            pen += face.advance(ch, px) + letter_spacing;
        }
    } else {
        let mut prev = None;
        for ch in text.chars() {
            if let Some(p) = prev {
                pen += face.kern(p, ch, px).unwrap_or(0.0);
            }
            draw_glyph(&mut buffer, face, ch, px, pen, metrics.ascent, fill);
            pen += face.advance(ch, px);
            prev = Some(ch);
        }
    }

    Some(RasterText {
        buffer,
        text_width,
        text_height,
        ascent: metrics.ascent,
    })
}

fn draw_glyph(
    buffer: &mut PixelBuffer,
    face: &dyn Face,
    ch: char,
    px: f32,
    pen: f32,
    ascent: f32,
    fill: &Fill,
) {
    let glyph = face.rasterize(ch, px);
    if glyph.width == 0 || glyph.height == 0 {
        return;
    }

    let origin_x = (pen + glyph.xmin as f32).round() as i64;
    let origin_y = (ascent - (glyph.height as f32 + glyph.ymin as f32)).round() as i64;
    let width = buffer.width();

    for gy in 0..glyph.height {
        for gx in 0..glyph.width {
            let coverage = glyph.coverage[gy * glyph.width + gx];
            if coverage == 0 {
                continue;
            }
            let x = origin_x + gx as i64;
            let y = origin_y + gy as i64;
            if x < 0 || y < 0 {
                continue;
            }
            let color = fill
                .color_at(x as u32, width)
                .with_opacity(coverage as f32 / 255.0);
            buffer.blend(x as u32, y as u32, color);
        }
    }
}
