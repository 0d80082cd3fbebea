//! Workout engine orchestration.
//!
//! The `WorkoutEngine` walks a [`WorkoutSequence`], counting each phase
//! down one second per tick, firing the cue at every boundary and reporting
//! each change to the display.

use std::panic::AssertUnwindSafe;
use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::cue::Cue;
use crate::display::{PhaseView, WorkoutDisplay};

use super::scheduler::{DEFAULT_TICK_PERIOD, Scheduler, TickHandle};
use super::sequence::{ExercisePhase, WorkoutSequence};
use super::state::{EngineSnapshot, EngineState, EngineStatus};

/// Countdown state machine over a fixed exercise sequence.
///
/// States: `Idle` → `Running` ⇄ `Stopped`, `Running` → `Complete`;
/// `reset` returns to `Idle` from anywhere. No operation fails: calls that
/// make no sense in the current state are logged and ignored.
///
/// The engine is not internally synchronized. Hosts with more than one
/// thread should own it from a single task, as
/// [`spawn_engine`](super::driver::spawn_engine) does.
pub struct WorkoutEngine {
    sequence: WorkoutSequence,
    state: EngineState,
    display: Box<dyn WorkoutDisplay>,
    cue: Box<dyn Cue>,
    scheduler: Box<dyn Scheduler>,
    tick_period: Duration,
    ticker: Option<TickHandle>,
}

impl WorkoutEngine {
    /// Creates an idle engine and shows the ready state on `display`.
    #[must_use]
    pub fn new(
        sequence: WorkoutSequence,
        display: impl WorkoutDisplay + 'static,
        cue: impl Cue + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> Self {
        let mut engine = Self {
            sequence,
            state: EngineState::default(),
            display: Box::new(display),
            cue: Box::new(cue),
            scheduler: Box::new(scheduler),
            tick_period: DEFAULT_TICK_PERIOD,
            ticker: None,
        };
        debug!(phases = engine.sequence.len(), "workout engine created");
        engine.display.on_ready();
        engine
    }

    /// Overrides the wall-clock period between ticks.
    ///
    /// Each tick still counts down exactly one second of workout time.
    #[must_use]
    pub fn with_tick_period(mut self, period: Duration) -> Self {
        self.tick_period = period;
        self
    }

    /// Starts or resumes the countdown.
    ///
    /// A fresh start loads the current phase's duration; a resume after
    /// [`stop`](Self::stop) continues from the preserved remaining time.
    /// Ignored while running, and once complete (reset first).
    pub fn start(&mut self) {
        match self.state.status {
            EngineStatus::Running => {
                debug!("start ignored: already running");
                return;
            }
            EngineStatus::Complete => {
                debug!("start ignored: workout complete");
                return;
            }
            EngineStatus::Idle | EngineStatus::Stopped => {}
        }

        if self.state.remaining_seconds == 0 {
            let Some(phase) = self.sequence.get(self.state.current_index) else {
                return;
            };
            self.state.remaining_seconds = phase.duration_seconds();
            self.state.phase_total_seconds = phase.duration_seconds();
            info!(
                step = phase.step_number(),
                phase = phase.name(),
                duration = phase.duration_seconds(),
                "phase started"
            );
        } else {
            info!(remaining = self.state.remaining_seconds, "workout resumed");
        }

        self.state.status = EngineStatus::Running;
        self.ticker = Some(self.scheduler.schedule(self.tick_period));
        self.notify_tick();
    }

    /// Pauses the countdown, keeping the remaining time. Ignored unless
    /// running.
    pub fn stop(&mut self) {
        if !self.state.status.is_running() {
            debug!(status = %self.state.status, "stop ignored: not running");
            return;
        }
        self.cancel_ticker();
        self.state.status = EngineStatus::Stopped;
        info!(
            remaining = self.state.remaining_seconds,
            step = self.state.current_index + 1,
            "workout stopped"
        );
    }

    /// Returns to the first phase with no time loaded and shows the ready
    /// state. Valid from any state.
    pub fn reset(&mut self) {
        self.cancel_ticker();
        self.state = EngineState::default();
        info!("workout reset");
        self.display.on_ready();
    }

    /// Counts down one second. Ignored unless running.
    pub fn tick(&mut self) {
        self.elapse(1);
    }

    /// Counts down `seconds`, crossing as many phase boundaries as needed.
    ///
    /// Every boundary crossed plays the cue once. Overshoot past a boundary
    /// is carried into the next phase; with one-second ticks the overshoot
    /// is always zero, so a new phase starts at its full duration.
    fn elapse(&mut self, seconds: u32) {
        if !self.state.status.is_running() {
            trace!(status = %self.state.status, "tick ignored: not running");
            return;
        }

        let mut overshoot = seconds;
        loop {
            if overshoot < self.state.remaining_seconds {
                self.state.remaining_seconds -= overshoot;
                break;
            }
            // remaining <= 0 after the countdown: this phase is over.
            overshoot -= self.state.remaining_seconds;
            self.state.remaining_seconds = 0;
            self.play_cue();
            if !self.advance() {
                self.display.on_complete();
                return;
            }
        }

        self.notify_tick();
    }

    /// Moves to the next phase. Returns `false` when the sequence is
    /// exhausted, after cancelling the tick source.
    fn advance(&mut self) -> bool {
        let from = self.state.current_index;
        self.state.current_index += 1;

        if let Some(next) = self.sequence.get(self.state.current_index) {
            self.state.remaining_seconds = next.duration_seconds();
            self.state.phase_total_seconds = next.duration_seconds();
            info!(
                from = from + 1,
                to = next.step_number(),
                phase = next.name(),
                duration = next.duration_seconds(),
                "phase transition"
            );
            return true;
        }

        self.cancel_ticker();
        self.state.status = EngineStatus::Complete;
        info!(phases = self.sequence.len(), "workout complete");
        false
    }

    fn play_cue(&mut self) {
        let cue = &mut self.cue;
        match std::panic::catch_unwind(AssertUnwindSafe(|| cue.play())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "cue failed"),
            Err(_) => warn!("cue panicked"),
        }
    }

    fn cancel_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.cancel();
        }
    }

    fn notify_tick(&mut self) {
        let Some(phase) = self.sequence.get(self.state.current_index) else {
            return;
        };
        let view = PhaseView {
            remaining_seconds: self.state.remaining_seconds,
            phase_total_seconds: self.state.phase_total_seconds,
            phase_name: phase.name(),
            step_number: phase.step_number(),
            step_count: self.sequence.len(),
            kind: phase.kind(),
            progress: self.state.progress(),
        };
        self.display.on_tick(&view);
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> EngineStatus {
        self.state.status
    }

    /// Current countdown state.
    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    /// The sequence being walked.
    #[must_use]
    pub const fn sequence(&self) -> &WorkoutSequence {
        &self.sequence
    }

    /// The phase at the current index, `None` once complete.
    #[must_use]
    pub fn current_phase(&self) -> Option<&ExercisePhase> {
        self.sequence.get(self.state.current_index)
    }

    /// Elapsed fraction of the current phase.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.state.progress()
    }

    /// Generation of the live tick source, if one is running.
    #[must_use]
    pub fn tick_generation(&self) -> Option<u64> {
        self.ticker.as_ref().map(TickHandle::generation)
    }

    /// Copies the current state with the phase resolved.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        let phase = self.current_phase();
        EngineSnapshot {
            status: self.state.status,
            current_index: self.state.current_index,
            phase_name: phase.map(|p| p.name().to_string()),
            step_number: phase.map(ExercisePhase::step_number),
            step_count: self.sequence.len(),
            remaining_seconds: self.state.remaining_seconds,
            phase_total_seconds: self.state.phase_total_seconds,
            progress: self.state.progress(),
        }
    }
}

impl Drop for WorkoutEngine {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

impl std::fmt::Debug for WorkoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkoutEngine")
            .field("num_phases", &self.sequence.len())
            .field("state", &self.state)
            .field("tick_period", &self.tick_period)
            .finish_non_exhaustive()
    }
}
