//! End-to-end lifecycle scenarios driven over simulated time.

use fzt_core::{Fill, FontFamily, FontSize, FuzzConfig, JitterDirection, Viewport};
use fzt_raster::testing::BlockFace;
use fzt_raster::{FontStore, rasterize};
use fzt_runtime::{Environment, FuzzyText};

fn store() -> FontStore {
    let mut store = FontStore::new();
    store.insert_face("Test", 400, Box::new(BlockFace::new()));
    store
}

fn base_config(text: &str) -> FuzzConfig {
    FuzzConfig::new(text)
        .font_size(FontSize::Px(10.0))
        .font_family(FontFamily::Named("Test".into()))
        .font_weight(400)
}

fn started(config: FuzzConfig) -> FuzzyText {
    let mut engine = FuzzyText::new(config, Environment::default(), store()).with_seed(11);
    engine.init();
    engine
}

#[test]
fn glitch_timeline_follows_interval_and_duration() {
    let config = base_config("AB")
        .glitch_mode(true)
        .glitch_interval(1000.0)
        .glitch_duration(200.0);
    let mut engine = started(config);
    engine.advance(1.0);

    engine.advance_to(999.0);
    assert!(!engine.state().glitching, "not glitching before the interval");
    engine.advance_to(1000.0);
    assert!(engine.state().glitching, "glitching at t=1000");
    engine.advance_to(1199.0);
    assert!(engine.state().glitching, "still glitching at t=1199");
    engine.advance_to(1200.0);
    assert!(!engine.state().glitching, "burst over at t=1200");
    engine.advance_to(1999.0);
    assert!(!engine.state().glitching);
    engine.advance_to(2000.0);
    assert!(engine.state().glitching, "next burst at t=2000");
}

#[test]
fn glitch_cycle_survives_large_time_leaps() {
    let config = base_config("AB")
        .glitch_mode(true)
        .glitch_interval(1000.0)
        .glitch_duration(200.0);
    let mut engine = started(config);
    engine.advance(1.0);

    // Whole cycles collapse into one advance; the state at the end still
    // reflects the schedule (burst 4000..4200 is over by 4500).
    engine.advance_to(4500.0);
    assert!(!engine.state().glitching);
    engine.advance_to(5000.0);
    assert!(engine.state().glitching);
}

#[test]
fn glitch_mode_off_never_bursts() {
    let mut engine = started(base_config("AB").glitch_mode(false));
    engine.advance(20_000.0);
    assert!(!engine.state().glitching);
}

#[test]
fn disposal_freezes_all_observable_state() {
    let config = base_config("AB")
        .glitch_mode(true)
        .glitch_interval(1000.0)
        .glitch_duration(200.0);
    let mut engine = started(config);
    engine.advance(500.0);

    engine.dispose();
    let frames = engine.frames_committed();
    let state = *engine.state();

    // Several glitch cycles' worth of simulated time after disposal:
    // nothing fires, nothing draws, no flag flips.
    engine.advance(10_000.0);
    assert_eq!(engine.frames_committed(), frames);
    assert_eq!(*engine.state(), state);
    assert!(!engine.state().glitching);
    engine.pointer_moved(60.0, 5.0);
    assert!(!engine.state().hovering);
}

#[test]
fn zero_fuzz_range_means_zero_displacement_at_any_intensity() {
    let config = base_config("AB")
        .fuzz_range(0.0)
        .direction(JitterDirection::Both)
        .glitch_mode(true)
        .glitch_interval(100.0)
        .glitch_duration(1000.0);
    let mut engine = started(config);

    // Run into the glitch burst so intensity is at maximum.
    engine.advance(500.0);
    assert!(engine.state().glitching);
    assert_eq!(engine.state().current, 1.0);

    let reference =
        rasterize(&BlockFace::new(), "AB", 10.0, 0.0, &Fill::default()).unwrap();
    let surface = engine.surface().unwrap();
    // Margins collapse to the bare padding when the fuzz range is zero.
    assert_eq!(surface.margin_x(), 20);
    assert_eq!(surface.margin_y(), 10);
    for y in 0..reference.buffer.height() {
        for x in 0..reference.buffer.width() {
            assert_eq!(
                surface.pixels().get(x + 20, y + 10),
                reference.buffer.get(x, y),
                "row {y} displaced at column {x}"
            );
        }
    }
}

#[test]
fn resize_swaps_generations_without_overlap() {
    let config = base_config("AB")
        .glitch_mode(true)
        .glitch_interval(100.0)
        .glitch_duration(50.0);
    let mut engine = started(config);
    engine.advance(10.0);
    let first = engine.generation();

    engine.viewport_resized(Viewport::new(640.0, 480.0));
    assert_eq!(engine.generation(), first + 1);

    // The old generation's burst was armed for t=100; it must never fire.
    engine.advance_to(105.0);
    assert!(!engine.state().glitching, "stale generation timer fired");

    // The new generation armed its own at t=10+100.
    engine.advance_to(110.0);
    assert!(engine.state().glitching);
}

#[test]
fn each_resize_notification_rebuilds_once() {
    let mut engine = started(base_config("AB").glitch_mode(false));
    engine.advance(1.0);
    let first = engine.generation();

    for i in 1..=3u64 {
        engine.viewport_resized(Viewport::new(600.0 + i as f32, 400.0));
        assert_eq!(engine.generation(), first + i);
    }
    engine.advance(50.0);
    assert!(engine.surface().is_some());
}

#[test]
fn hover_eases_intensity_toward_hover_level() {
    let config = base_config("AB")
        .glitch_mode(false)
        .transition_duration(200.0)
        .base_intensity(0.2)
        .hover_intensity(0.9);
    let mut engine = started(config);
    engine.advance(1.0);

    engine.pointer_moved(55.0, 5.0);
    assert!(engine.state().hovering);

    let mut prev = engine.state().current;
    assert_eq!(prev, 0.2);
    for _ in 0..30 {
        engine.advance(100.0);
        let current = engine.state().current;
        assert!(current >= prev - f32::EPSILON, "intensity regressed");
        assert!(current <= 0.9 + f32::EPSILON, "intensity overshot");
        prev = current;
    }
    assert!((prev - 0.9).abs() < 1e-3, "converged to {prev}");

    engine.pointer_left();
    engine.advance(5_000.0);
    assert!((engine.state().current - 0.2).abs() < 1e-3);
}

#[test]
fn config_swap_restarts_with_new_text() {
    let mut engine = started(base_config("AB").glitch_mode(false));
    engine.advance(1.0);
    let narrow = engine.surface().unwrap().width();

    engine.set_config(base_config("ABCD").glitch_mode(false));
    engine.advance(1.0);
    let wide = engine.surface().unwrap().width();
    assert!(wide > narrow, "{narrow} -> {wide}");
}

#[test]
fn engine_without_init_schedules_nothing() {
    let mut engine = FuzzyText::new(base_config("AB"), Environment::default(), store());
    engine.advance(5_000.0);
    assert!(engine.surface().is_none());
    assert_eq!(engine.frames_committed(), 0);
}
