#![forbid(unsafe_code)]

//! Core data types for the fuzzed-text engine.
//!
//! This crate is the dependency-light bottom of the stack: packed pixel
//! colors and gradients, f32 pixel geometry, the pointer/resize event
//! surface, and the immutable render configuration. No I/O, no timers,
//! no font handling; those live in `fzt-raster` and `fzt-runtime`.

pub mod color;
pub mod config;
pub mod event;
pub mod geometry;

pub use color::{ColorGradient, PackedRgba, lerp_color};
pub use config::{Fill, FontFamily, FontSize, FuzzConfig, JitterDirection};
pub use event::{Event, PointerEvent};
pub use geometry::{RectF, Viewport};
