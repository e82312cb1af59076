#![forbid(unsafe_code)]

//! Fuzzed-text runtime.
//!
//! This crate is the orchestrator: it owns the single-threaded cooperative
//! scheduler, the intensity state machine, the per-row jitter compositor,
//! and the generation lifecycle that ties them together.
//!
//! # Concurrency model
//!
//! Everything runs on the caller's thread. Timers and the frame loop are
//! entries in one virtual-time priority queue; the embedder (or a test)
//! drives it with [`FuzzyText::advance_to`]. There is no locking because
//! there is no parallelism. The one suspension point of a generation is
//! font resolution inside the Init task; the scheduler's generation
//! compare at pop guarantees a canceled generation never draws after its
//! cancellation.
//!
//! # Key components
//!
//! - [`FuzzyText`]: the engine, driving init → animate → dispose for one
//!   generation at a time
//! - [`Scheduler`]: virtual-clock task queue with per-entry generation
//!   tags and explicit cancellation
//! - [`RenderState`]: intensity value plus the hover/click/glitch flags
//! - [`RowJitter`]: seedable per-row offset table
//! - [`Surface`]: the visible pixel surface with jitter margins

pub mod engine;
pub mod intensity;
pub mod jitter;
pub mod scheduler;
pub mod surface;

pub use engine::{Environment, FuzzyText};
pub use intensity::RenderState;
pub use jitter::{RowJitter, composite};
pub use scheduler::{DueTask, Generation, Scheduler, Task, TaskId};
pub use surface::Surface;
