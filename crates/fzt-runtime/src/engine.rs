#![forbid(unsafe_code)]

//! Generation lifecycle: init → animate → dispose.
//!
//! One [`FuzzyText`] drives exactly one generation at a time. A generation
//! owns the raster buffer, the visible surface, the frame loop, and the
//! glitch/click timers; any viewport, font, or config change disposes it
//! synchronously and schedules a fresh Init under a new generation id.
//! The scheduler drops stale-generation entries at pop, so a canceled
//! generation can never draw, including the Init task itself, which is
//! the generation's one suspension point (font resolution).
//!
//! # Failure modes
//!
//! | failure | behavior |
//! |---------|----------|
//! | exact face missing | fallback ladder, degraded face renders |
//! | empty font store | init aborts, engine stays blank but alive |
//! | degenerate raster (empty text) | init aborts, blank but alive |
//! | canceled mid-init | entry dropped at pop, nothing drawn |

use fzt_core::{Event, FontFamily, FuzzConfig, PointerEvent, Viewport};
use fzt_raster::{FontStore, RasterText, rasterize};

use crate::intensity::RenderState;
use crate::jitter::{RowJitter, composite};
use crate::scheduler::{DueTask, Generation, Scheduler, Task, TaskId};
use crate::surface::Surface;

/// Padding added to the fuzz range for the horizontal jitter margin.
const MARGIN_X_PAD: u32 = 20;

/// Padding added to the fuzz range for the vertical jitter margin.
const MARGIN_Y_PAD: u32 = 10;

/// Milliseconds a click burst lasts before its reset timer fires.
const CLICK_RESET_MS: f64 = 300.0;

/// Ambient context supplied by the embedder.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Current viewport; relative font sizes resolve against it.
    pub viewport: Viewport,
    /// Family used when the config says [`FontFamily::Inherit`].
    pub ambient_family: String,
    /// Milliseconds between animation-frame polls (display refresh).
    pub refresh_interval: f32,
    /// Surface top-left in client coordinates, for pointer translation.
    pub surface_origin: (f32, f32),
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            ambient_family: "sans-serif".to_string(),
            refresh_interval: 1000.0 / 60.0,
            surface_origin: (0.0, 0.0),
        }
    }
}

/// The fuzzed-text engine.
pub struct FuzzyText {
    config: FuzzConfig,
    env: Environment,
    fonts: FontStore,
    scheduler: Scheduler,
    generation: Generation,
    state: RenderState,
    jitter: RowJitter,
    raster: Option<RasterText>,
    surface: Option<Surface>,
    frame_task: Option<TaskId>,
    glitch_on_task: Option<TaskId>,
    glitch_off_task: Option<TaskId>,
    click_task: Option<TaskId>,
    frames_committed: u64,
    started: bool,
    disposed: bool,
}

impl FuzzyText {
    /// Create an engine; nothing is scheduled until [`init`](Self::init).
    pub fn new(config: FuzzConfig, env: Environment, fonts: FontStore) -> Self {
        let base = config.base_intensity;
        Self {
            config,
            env,
            fonts,
            scheduler: Scheduler::new(),
            generation: 0,
            state: RenderState::new(base),
            jitter: RowJitter::new(),
            raster: None,
            surface: None,
            frame_task: None,
            glitch_on_task: None,
            glitch_off_task: None,
            click_task: None,
            frames_committed: 0,
            started: false,
            disposed: false,
        }
    }

    /// Replace the jitter seed for deterministic frames.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.jitter = RowJitter::with_seed(seed);
        self
    }

    /// Schedule the first generation. Idempotent; a no-op after disposal.
    pub fn init(&mut self) {
        if self.disposed || self.started {
            return;
        }
        self.started = true;
        self.scheduler.schedule_after(0.0, self.generation, Task::Init);
        tracing::debug!(generation = self.generation, "engine started");
    }

    /// Advance the virtual clock by `ms`, running everything that comes
    /// due.
    pub fn advance(&mut self, ms: f64) {
        self.advance_to(self.scheduler.now() + ms.max(0.0));
    }

    /// Advance the virtual clock to absolute time `t`, running everything
    /// that comes due on the way.
    pub fn advance_to(&mut self, t: f64) {
        let t = t.max(self.scheduler.now());
        while let Some(due) = self.scheduler.pop_due(t, self.generation) {
            self.dispatch(due);
        }
    }

    /// Route an ambient event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Pointer(PointerEvent::Moved { x, y }) => self.pointer_moved(x, y),
            Event::Pointer(PointerEvent::Left) => self.pointer_left(),
            Event::Pointer(PointerEvent::Pressed) => self.pointer_pressed(),
            Event::Resized(viewport) => self.viewport_resized(viewport),
            Event::FontsChanged => self.fonts_changed(),
        }
    }

    /// Pointer moved in client coordinates: hit-test against the measured
    /// text box. Ignored when hover is disabled.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !self.config.enable_hover || self.disposed {
            return;
        }
        let (Some(raster), Some(surface)) = (self.raster.as_ref(), self.surface.as_ref()) else {
            return;
        };
        let local_x = x - self.env.surface_origin.0;
        let local_y = y - self.env.surface_origin.1;
        let hit_box = surface.content_rect(raster.text_width, raster.text_height);
        self.state.hovering = hit_box.contains(local_x, local_y);
    }

    /// Pointer left the surface: hovering drops unconditionally.
    pub fn pointer_left(&mut self) {
        if !self.config.enable_hover || self.disposed {
            return;
        }
        self.state.hovering = false;
    }

    /// Pointer pressed: when the click effect is enabled, burst to
    /// maximum intensity and arm the reset timer.
    pub fn pointer_pressed(&mut self) {
        if !self.config.click_effect || self.disposed || self.raster.is_none() {
            return;
        }
        self.state.clicking = true;
        if let Some(id) = self.click_task.take() {
            self.scheduler.cancel(id);
        }
        self.click_task = Some(self.scheduler.schedule_after(
            CLICK_RESET_MS,
            self.generation,
            Task::ClickReset,
        ));
    }

    /// Viewport changed: full un-debounced rebuild under a new generation.
    pub fn viewport_resized(&mut self, viewport: Viewport) {
        if self.disposed {
            return;
        }
        self.env.viewport = viewport;
        self.restart();
    }

    /// Available fonts changed: full rebuild under a new generation.
    pub fn fonts_changed(&mut self) {
        if self.disposed {
            return;
        }
        self.restart();
    }

    /// Swap the configuration: full rebuild under a new generation.
    pub fn set_config(&mut self, config: FuzzConfig) {
        if self.disposed {
            return;
        }
        self.config = config;
        self.restart();
    }

    /// The composited visible surface, once a generation has rendered.
    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    /// The current animation state (read-only).
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// The live generation id.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Frames committed (skipped polls excluded) across all generations.
    pub fn frames_committed(&self) -> u64 {
        self.frames_committed
    }

    /// Current virtual time in milliseconds.
    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Mutable access to the font store. Call
    /// [`fonts_changed`](Self::fonts_changed) after loading so the text
    /// re-rasterizes with the new faces.
    pub fn fonts_mut(&mut self) -> &mut FontStore {
        &mut self.fonts
    }

    /// Tear everything down. After this returns no frame is ever
    /// committed and no timer ever flips a flag again. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.teardown_generation();
        self.generation += 1;
        self.disposed = true;
        tracing::debug!(generation = self.generation, "engine disposed");
    }

    /// Cancel the live generation's loop and timers and drop its buffers.
    /// Must complete before the next generation builds anything.
    fn teardown_generation(&mut self) {
        for slot in [
            &mut self.frame_task,
            &mut self.glitch_on_task,
            &mut self.glitch_off_task,
            &mut self.click_task,
        ] {
            if let Some(id) = slot.take() {
                self.scheduler.cancel(id);
            }
        }
        self.raster = None;
        self.surface = None;
    }

    fn restart(&mut self) {
        self.teardown_generation();
        self.generation += 1;
        if self.started {
            self.scheduler.schedule_after(0.0, self.generation, Task::Init);
            tracing::debug!(generation = self.generation, "generation restarted");
        }
    }

    fn dispatch(&mut self, due: DueTask) {
        match due.task {
            Task::Init => self.run_init(),
            Task::Frame => self.run_frame(),
            Task::GlitchOn => {
                self.glitch_on_task = None;
                self.state.glitching = true;
                self.glitch_off_task = Some(self.scheduler.schedule_after(
                    self.config.glitch_duration as f64,
                    self.generation,
                    Task::GlitchOff,
                ));
                tracing::trace!(now = self.scheduler.now(), "glitch burst on");
            }
            Task::GlitchOff => {
                self.glitch_off_task = None;
                self.state.glitching = false;
                // The burst cadence is interval measured on-to-on, so the
                // re-arm delay excludes the duration just spent glitching.
                let delay =
                    (self.config.glitch_interval - self.config.glitch_duration).max(0.0);
                self.glitch_on_task = Some(self.scheduler.schedule_after(
                    delay as f64,
                    self.generation,
                    Task::GlitchOn,
                ));
                tracing::trace!(now = self.scheduler.now(), "glitch burst off");
            }
            Task::ClickReset => {
                self.click_task = None;
                self.state.clicking = false;
            }
        }
    }

    /// Build the generation: resolve fonts, rasterize once, size the
    /// surface, start the loop and timers.
    fn run_init(&mut self) {
        let family = match &self.config.font_family {
            FontFamily::Inherit => self.env.ambient_family.clone(),
            FontFamily::Named(name) => name.clone(),
        };
        let px = self.config.font_size.resolve(&self.env.viewport);

        // Font resolution is the generation's suspension point; a stale
        // generation's Init never reaches this line (dropped at pop).
        let raster = {
            let resolved = match self.fonts.resolve(&family, self.config.font_weight) {
                Ok(resolved) => resolved,
                Err(err) => {
                    tracing::debug!(%err, "init aborted: no usable font face");
                    return;
                }
            };
            match rasterize(
                resolved.face,
                &self.config.text,
                px,
                self.config.letter_spacing,
                &self.config.fill,
            ) {
                Some(raster) => raster,
                None => {
                    tracing::debug!("init aborted: degenerate text bounds");
                    return;
                }
            }
        };

        let margin_x = self.config.fuzz_range.ceil() as u32 + MARGIN_X_PAD;
        let margin_y = if self.config.direction.vertical() {
            self.config.fuzz_range.ceil() as u32 + MARGIN_Y_PAD
        } else {
            0
        };
        let surface = Surface::new(
            raster.buffer.width(),
            raster.buffer.height(),
            margin_x,
            margin_y,
        );

        tracing::debug!(
            generation = self.generation,
            width = surface.width(),
            height = surface.height(),
            text_width = raster.text_width,
            text_height = raster.text_height,
            "generation initialized"
        );

        self.state = RenderState::new(self.config.base_intensity);
        self.raster = Some(raster);
        self.surface = Some(surface);

        self.frame_task = Some(self.scheduler.schedule_after(
            self.env.refresh_interval as f64,
            self.generation,
            Task::Frame,
        ));
        if self.config.glitch_mode {
            self.glitch_on_task = Some(self.scheduler.schedule_after(
                self.config.glitch_interval as f64,
                self.generation,
                Task::GlitchOn,
            ));
        }
    }

    /// One animation-frame poll: throttle below the fps cap, otherwise
    /// commit a frame, then re-arm.
    fn run_frame(&mut self) {
        self.frame_task = None;
        let now = self.scheduler.now();

        if now - self.state.last_frame >= self.config.frame_time() as f64 {
            self.state.last_frame = now;
            self.state.update(&self.config);

            if let (Some(raster), Some(surface)) = (self.raster.as_ref(), self.surface.as_mut())
            {
                self.jitter.regenerate(
                    raster.buffer.height() as usize,
                    self.config.fuzz_range,
                    self.state.current,
                    self.config.direction,
                );
                composite(raster, self.jitter.offsets(), surface);
                self.frames_committed += 1;
            }
        }

        self.frame_task = Some(self.scheduler.schedule_after(
            self.env.refresh_interval as f64,
            self.generation,
            Task::Frame,
        ));
    }
}

impl std::fmt::Debug for FuzzyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyText")
            .field("generation", &self.generation)
            .field("started", &self.started)
            .field("disposed", &self.disposed)
            .field("frames_committed", &self.frames_committed)
            .field("has_surface", &self.surface.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fzt_core::{FontSize, JitterDirection};
    use fzt_raster::testing::BlockFace;

    fn store() -> FontStore {
        let mut store = FontStore::new();
        store.insert_face("Test", 400, Box::new(BlockFace::new()));
        store
    }

    fn config() -> FuzzConfig {
        FuzzConfig::new("AB")
            .font_size(FontSize::Px(10.0))
            .font_family(FontFamily::Named("Test".into()))
            .font_weight(400)
            .glitch_mode(false)
    }

    fn engine(config: FuzzConfig) -> FuzzyText {
        let mut engine = FuzzyText::new(config, Environment::default(), store()).with_seed(7);
        engine.init();
        engine
    }

    #[test]
    fn init_builds_surface_with_margins() {
        let mut e = engine(config().fuzz_range(30.0));
        e.advance(1.0);
        let surface = e.surface().expect("surface after init");
        // Raster buffer 32x11, horizontal margin 30 + 20 each side.
        assert_eq!(surface.width(), 32 + 2 * 50);
        assert_eq!(surface.height(), 11);
        assert_eq!(surface.margin_y(), 0);
    }

    #[test]
    fn vertical_direction_adds_vertical_margin() {
        let mut e = engine(config().fuzz_range(30.0).direction(JitterDirection::Both));
        e.advance(1.0);
        let surface = e.surface().unwrap();
        assert_eq!(surface.margin_y(), 40);
        assert_eq!(surface.height(), 11 + 2 * 40);
    }

    #[test]
    fn margins_cover_the_fuzz_range() {
        let mut e = engine(config().fuzz_range(13.7).direction(JitterDirection::Both));
        e.advance(1.0);
        let surface = e.surface().unwrap();
        assert!(surface.margin_x() as f32 >= 13.7);
        assert!(surface.margin_y() as f32 >= 13.7);
    }

    #[test]
    fn empty_store_renders_nothing_but_stays_alive() {
        let mut e = FuzzyText::new(config(), Environment::default(), FontStore::new());
        e.init();
        e.advance(100.0);
        assert!(e.surface().is_none());
        assert!(!e.is_disposed());
    }

    #[test]
    fn empty_text_renders_nothing() {
        let mut e = engine(config().font_size(FontSize::Px(10.0)));
        e.set_config(FuzzConfig::new("").font_family(FontFamily::Named("Test".into())));
        e.advance(100.0);
        assert!(e.surface().is_none());
    }

    #[test]
    fn frames_commit_at_the_fps_cap() {
        let mut e = engine(config().fps(50.0));
        e.advance(1.0);
        assert_eq!(e.frames_committed(), 0);
        // A 50 fps budget polled at 60 Hz commits every other poll, the
        // same stair-step a throttled animation-frame loop shows.
        e.advance(500.0);
        let committed = e.frames_committed();
        assert!(
            (13..=16).contains(&committed),
            "committed {committed} frames"
        );
    }

    #[test]
    fn polls_below_the_cap_skip() {
        let mut e = engine(config().fps(10.0));
        // 60 Hz polls against a 100 ms frame budget.
        e.advance(1000.0);
        let committed = e.frames_committed();
        assert!((8..=11).contains(&committed), "committed {committed}");
    }

    #[test]
    fn hit_test_inclusive_inside_and_exclusive_outside() {
        let mut e = engine(config().fuzz_range(30.0));
        e.advance(1.0);
        let (raster_w, raster_h) = (12.0, 11.0);
        let margin = 50.0;

        e.pointer_moved(margin, 0.0);
        assert!(e.state().hovering, "top-left corner is inside");
        e.pointer_moved(margin + raster_w, raster_h);
        assert!(e.state().hovering, "bottom-right corner is inside");
        e.pointer_moved(margin - 0.5, 5.0);
        assert!(!e.state().hovering);
        e.pointer_moved(margin + raster_w + 0.5, 5.0);
        assert!(!e.state().hovering);
    }

    #[test]
    fn pointer_leave_unconditionally_clears_hover() {
        let mut e = engine(config());
        e.advance(1.0);
        e.pointer_moved(55.0, 5.0);
        assert!(e.state().hovering);
        e.pointer_left();
        assert!(!e.state().hovering);
    }

    #[test]
    fn hover_disabled_ignores_pointer() {
        let mut e = engine(config().enable_hover(false));
        e.advance(1.0);
        e.pointer_moved(55.0, 5.0);
        assert!(!e.state().hovering);
    }

    #[test]
    fn pointer_translation_uses_surface_origin() {
        let mut env = Environment::default();
        env.surface_origin = (100.0, 200.0);
        let mut e = FuzzyText::new(config(), env, store());
        e.init();
        e.advance(1.0);
        e.pointer_moved(155.0, 205.0);
        assert!(e.state().hovering);
        e.pointer_moved(55.0, 5.0);
        assert!(!e.state().hovering);
    }

    #[test]
    fn click_effect_bursts_and_resets() {
        let mut e = engine(config().click_effect(true));
        e.advance(1.0);
        e.pointer_pressed();
        assert!(e.state().clicking);
        // Next committed frame snaps intensity to maximum.
        e.advance(20.0);
        assert_eq!(e.state().current, 1.0);
        e.advance(CLICK_RESET_MS);
        assert!(!e.state().clicking);
    }

    #[test]
    fn click_effect_disabled_is_inert() {
        let mut e = engine(config());
        e.advance(1.0);
        e.pointer_pressed();
        assert!(!e.state().clicking);
    }

    #[test]
    fn resize_rebuilds_exactly_one_generation() {
        let mut e = engine(config());
        e.advance(1.0);
        let before = e.generation();
        e.viewport_resized(Viewport::new(640.0, 480.0));
        assert_eq!(e.generation(), before + 1);
        assert!(e.surface().is_none(), "old surface dropped synchronously");
        e.advance(1.0);
        assert!(e.surface().is_some(), "new generation rebuilt");
    }

    #[test]
    fn resize_resolves_relative_font_size_against_new_viewport() {
        let cfg = FuzzConfig::new("A")
            .font_family(FontFamily::Named("Test".into()))
            .font_weight(400)
            .glitch_mode(false)
            .font_size(FontSize::Clamp {
                min_px: 5.0,
                vw_percent: 10.0,
                max_px: 500.0,
            });
        let mut e = FuzzyText::new(cfg, Environment::default(), store());
        e.init();
        e.advance(1.0);
        let before = e.surface().unwrap().height();
        e.viewport_resized(Viewport::new(2560.0, 720.0));
        e.advance(1.0);
        let after = e.surface().unwrap().height();
        assert!(after > before, "larger viewport, larger text ({before} -> {after})");
    }

    #[test]
    fn dispose_is_terminal_and_idempotent() {
        let mut e = engine(config());
        e.advance(1.0);
        e.dispose();
        e.dispose();
        assert!(e.is_disposed());
        let frames = e.frames_committed();
        e.advance(10_000.0);
        assert_eq!(e.frames_committed(), frames);
        e.viewport_resized(Viewport::new(10.0, 10.0));
        e.advance(10.0);
        assert!(e.surface().is_none());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let run = || {
            let mut e = FuzzyText::new(
                config().fuzz_range(20.0),
                Environment::default(),
                store(),
            )
            .with_seed(1234);
            e.init();
            e.advance(300.0);
            e.surface().unwrap().pixels().clone()
        };
        assert_eq!(run(), run());
    }
}
