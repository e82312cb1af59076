#![forbid(unsafe_code)]

//! Immutable render configuration.
//!
//! A `FuzzConfig` is frozen for the lifetime of a generation; changing any
//! field means building a new config and restarting the engine with it.
//! Builder setters clamp intensity values into `[0, 1]` at construction so
//! the state machine only ever sees valid targets.

use crate::color::{ColorGradient, PackedRgba};
use crate::geometry::Viewport;

/// Which axes receive per-row jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JitterDirection {
    /// Horizontal offsets only (default).
    #[default]
    Horizontal,
    /// Vertical offsets only.
    Vertical,
    /// Independent offsets on both axes.
    Both,
}

impl JitterDirection {
    /// Whether rows shift left/right.
    #[inline]
    pub const fn horizontal(self) -> bool {
        !matches!(self, Self::Vertical)
    }

    /// Whether rows shift up/down.
    #[inline]
    pub const fn vertical(self) -> bool {
        !matches!(self, Self::Horizontal)
    }
}

/// Font size, either absolute or resolved against the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    /// Absolute pixel size.
    Px(f32),
    /// Viewport-relative size: `vw_percent` percent of the viewport width,
    /// clamped into `[min_px, max_px]`.
    Clamp {
        min_px: f32,
        vw_percent: f32,
        max_px: f32,
    },
}

impl FontSize {
    /// Resolve to a concrete pixel size.
    pub fn resolve(&self, viewport: &Viewport) -> f32 {
        match *self {
            Self::Px(px) => px.max(0.0),
            Self::Clamp {
                min_px,
                vw_percent,
                max_px,
            } => (vw_percent / 100.0 * viewport.width).clamp(min_px, max_px),
        }
    }
}

impl Default for FontSize {
    /// `clamp(2.5rem, 12vw, 8rem)` at a 16 px root em.
    fn default() -> Self {
        Self::Clamp {
            min_px: 40.0,
            vw_percent: 12.0,
            max_px: 128.0,
        }
    }
}

/// Font family selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum FontFamily {
    /// Use the embedding environment's ambient family.
    #[default]
    Inherit,
    /// A named family in the font store.
    Named(String),
}

/// Text fill: a solid color or a multi-stop linear gradient.
///
/// A gradient always overrides a solid color and spans the full raster
/// buffer width, padding included.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(PackedRgba),
    Gradient(ColorGradient),
}

impl Fill {
    /// Build a gradient fill from a color list, falling back to a solid
    /// fill of the first color when fewer than two colors are given.
    pub fn gradient(colors: &[PackedRgba]) -> Self {
        match ColorGradient::from_colors(colors) {
            Some(g) => Self::Gradient(g),
            None => Self::Solid(colors.first().copied().unwrap_or(PackedRgba::WHITE)),
        }
    }

    /// Color for the destination pixel column `x` of a buffer `width`
    /// pixels wide.
    #[inline]
    pub fn color_at(&self, x: u32, width: u32) -> PackedRgba {
        match self {
            Self::Solid(c) => *c,
            Self::Gradient(g) => {
                let t = if width > 1 {
                    x as f32 / (width - 1) as f32
                } else {
                    0.0
                };
                g.sample(t)
            }
        }
    }
}

impl Default for Fill {
    fn default() -> Self {
        Self::Solid(PackedRgba::WHITE)
    }
}

/// Immutable per-generation render configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzConfig {
    /// Text to rasterize.
    pub text: String,
    /// Font size (absolute or viewport-relative).
    pub font_size: FontSize,
    /// Font weight (CSS-style 100..=1000).
    pub font_weight: u16,
    /// Font family selection.
    pub font_family: FontFamily,
    /// Text fill.
    pub fill: Fill,
    /// Extra pixel gap inserted between characters.
    pub letter_spacing: f32,
    /// Maximum jitter amplitude in pixels.
    pub fuzz_range: f32,
    /// Animation frame cap.
    pub fps: f32,
    /// Which axes receive jitter.
    pub direction: JitterDirection,
    /// Intensity easing time constant in milliseconds (0 = instant).
    pub transition_duration: f32,
    /// Idle jitter intensity.
    pub base_intensity: f32,
    /// Intensity while hovering.
    pub hover_intensity: f32,
    /// Whether pointer hover modulates intensity.
    pub enable_hover: bool,
    /// Whether a pointer press triggers a maximum-intensity burst.
    pub click_effect: bool,
    /// Whether the periodic autonomous glitch burst runs.
    pub glitch_mode: bool,
    /// Milliseconds between glitch bursts.
    pub glitch_interval: f32,
    /// Milliseconds a glitch burst lasts.
    pub glitch_duration: f32,
}

impl FuzzConfig {
    /// Config with the given text and default options.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: FontSize::default(),
            font_weight: 1000,
            font_family: FontFamily::Inherit,
            fill: Fill::default(),
            letter_spacing: 0.0,
            fuzz_range: 30.0,
            fps: 120.0,
            direction: JitterDirection::Horizontal,
            transition_duration: 0.0,
            base_intensity: 0.3,
            hover_intensity: 0.8,
            enable_hover: true,
            click_effect: false,
            glitch_mode: true,
            glitch_interval: 3000.0,
            glitch_duration: 500.0,
        }
    }

    /// Set the font size.
    pub fn font_size(mut self, size: FontSize) -> Self {
        self.font_size = size;
        self
    }

    /// Set the font weight.
    pub fn font_weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    /// Set the font family.
    pub fn font_family(mut self, family: FontFamily) -> Self {
        self.font_family = family;
        self
    }

    /// Set a solid fill color.
    pub fn color(mut self, color: PackedRgba) -> Self {
        self.fill = Fill::Solid(color);
        self
    }

    /// Set a gradient fill from a color list (overrides any solid color).
    pub fn gradient(mut self, colors: &[PackedRgba]) -> Self {
        self.fill = Fill::gradient(colors);
        self
    }

    /// Set the letter spacing in pixels.
    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    /// Set the maximum jitter amplitude in pixels.
    pub fn fuzz_range(mut self, range: f32) -> Self {
        self.fuzz_range = range.max(0.0);
        self
    }

    /// Set the animation frame cap.
    pub fn fps(mut self, fps: f32) -> Self {
        self.fps = fps.max(1.0);
        self
    }

    /// Set the jitter direction.
    pub fn direction(mut self, direction: JitterDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the intensity easing time constant in milliseconds.
    pub fn transition_duration(mut self, ms: f32) -> Self {
        self.transition_duration = ms.max(0.0);
        self
    }

    /// Set the idle intensity (clamped into `[0, 1]`).
    pub fn base_intensity(mut self, intensity: f32) -> Self {
        self.base_intensity = intensity.clamp(0.0, 1.0);
        self
    }

    /// Set the hover intensity (clamped into `[0, 1]`).
    pub fn hover_intensity(mut self, intensity: f32) -> Self {
        self.hover_intensity = intensity.clamp(0.0, 1.0);
        self
    }

    /// Enable or disable pointer hover.
    pub fn enable_hover(mut self, enabled: bool) -> Self {
        self.enable_hover = enabled;
        self
    }

    /// Enable or disable the click burst.
    pub fn click_effect(mut self, enabled: bool) -> Self {
        self.click_effect = enabled;
        self
    }

    /// Enable or disable the periodic glitch burst.
    pub fn glitch_mode(mut self, enabled: bool) -> Self {
        self.glitch_mode = enabled;
        self
    }

    /// Set the glitch interval in milliseconds.
    pub fn glitch_interval(mut self, ms: f32) -> Self {
        self.glitch_interval = ms.max(0.0);
        self
    }

    /// Set the glitch duration in milliseconds.
    pub fn glitch_duration(mut self, ms: f32) -> Self {
        self.glitch_duration = ms.max(0.0);
        self
    }

    /// Minimum milliseconds between committed frames (`1000 / fps`).
    #[inline]
    pub fn frame_time(&self) -> f32 {
        1000.0 / self.fps
    }
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self::new("")
    }
}
