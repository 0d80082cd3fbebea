//! Workout engine
//!
//! Countdown state machine that walks an exercise sequence one second per
//! tick and signals every phase boundary.
//!
//! # Architecture
//!
//! - [`WorkoutSequence`]: Validated, immutable list of [`ExercisePhase`]s
//! - [`EngineState`]: Current index, remaining time, status
//! - [`WorkoutEngine`]: Start/stop/reset/tick over the sequence
//! - [`Scheduler`]: Injectable periodic tick source
//! - [`driver`]: Actor task that owns an engine and serializes all calls

pub mod driver;
pub mod engine;
pub mod scheduler;
pub mod sequence;
pub mod state;

pub use driver::{Control, EngineHandle, spawn_engine};
pub use engine::WorkoutEngine;
pub use scheduler::{
    DEFAULT_TICK_PERIOD, IntervalScheduler, ManualScheduler, Scheduler, TickHandle,
};
pub use sequence::{ExercisePhase, ExerciseSpec, PhaseKind, WorkoutSequence};
pub use state::{EngineSnapshot, EngineState, EngineStatus, format_clock, progress_fraction};
