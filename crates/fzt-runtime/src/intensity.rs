#![forbid(unsafe_code)]

//! Jitter intensity state machine.
//!
//! Target selection priority: clicking or glitching beats hovering beats
//! the idle baseline. The current value either snaps to the target
//! (transition duration 0) or takes a per-tick linear step of
//! `frame_time / transition_duration` toward it, clamped so it can never
//! overshoot. Event sources write only the boolean flags; the intensity
//! values are written nowhere but [`RenderState::update`].

use fzt_core::FuzzConfig;

/// Mutable per-generation animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    /// Current jitter intensity in `[0, 1]`.
    pub current: f32,
    /// Intensity being eased toward.
    pub target: f32,
    /// Pointer is inside the text's hit box.
    pub hovering: bool,
    /// A click burst is active.
    pub clicking: bool,
    /// A glitch burst is active.
    pub glitching: bool,
    /// Virtual timestamp of the last committed frame.
    pub last_frame: f64,
}

impl RenderState {
    /// Fresh state idling at the base intensity.
    pub fn new(base_intensity: f32) -> Self {
        Self {
            current: base_intensity,
            target: base_intensity,
            hovering: false,
            clicking: false,
            glitching: false,
            last_frame: 0.0,
        }
    }

    /// Select the target from the flags and ease the current value toward
    /// it. Called once per committed frame.
    pub fn update(&mut self, config: &FuzzConfig) {
        self.target = if self.clicking || self.glitching {
            1.0
        } else if self.hovering {
            config.hover_intensity
        } else {
            config.base_intensity
        };

        if config.transition_duration > 0.0 {
            let step = (config.frame_time() / config.transition_duration).min(1.0);
            self.current += (self.target - self.current) * step;
        } else {
            self.current = self.target;
        }
    }
}
