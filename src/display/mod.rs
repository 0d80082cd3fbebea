//! Display collaborators.
//!
//! The engine reports every state change through [`WorkoutDisplay`]. It
//! never renders anything itself.
//!
//! - [`TerminalDisplay`]: one human-readable line per update
//! - [`JsonDisplay`]: JSONL events through the observability emitter

pub mod json;
pub mod terminal;

pub use json::JsonDisplay;
pub use terminal::TerminalDisplay;

use serde::Serialize;

use crate::workout::PhaseKind;

/// What a display needs to render one countdown update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhaseView<'a> {
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Duration the current phase started with
    pub phase_total_seconds: u32,
    /// Current phase name
    pub phase_name: &'a str,
    /// 1-based step number of the current phase
    pub step_number: usize,
    /// Number of phases in the workout
    pub step_count: usize,
    /// Theming category of the current phase
    pub kind: PhaseKind,
    /// Elapsed fraction of the current phase, in `[0, 1]`
    pub progress: f64,
}

/// Rendering surface driven by the engine.
pub trait WorkoutDisplay: Send {
    /// Called after start and after every tick that leaves a phase active.
    fn on_tick(&mut self, view: &PhaseView<'_>);

    /// Called at construction and after reset. Shows a neutral "ready"
    /// indication with `00:00` and zero progress.
    fn on_ready(&mut self);

    /// Called exactly once when the sequence is exhausted. Shows a
    /// completion indication with `00:00` and full progress.
    fn on_complete(&mut self);
}

impl<D: WorkoutDisplay + ?Sized> WorkoutDisplay for Box<D> {
    fn on_tick(&mut self, view: &PhaseView<'_>) {
        (**self).on_tick(view);
    }

    fn on_ready(&mut self) {
        (**self).on_ready();
    }

    fn on_complete(&mut self) {
        (**self).on_complete();
    }
}
