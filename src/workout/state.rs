//! Engine state representation.
//!
//! Plain mutable state owned by a single [`WorkoutEngine`](super::WorkoutEngine).
//! Serialization of access is the job of the actor in [`super::driver`].

use std::fmt;

use serde::Serialize;

/// Lifecycle status of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// Never started, or freshly reset.
    #[default]
    Idle,
    /// Tick source active.
    Running,
    /// Paused mid-phase; remaining time is preserved.
    Stopped,
    /// Sequence exhausted. Only `reset` leaves this state.
    Complete,
}

impl EngineStatus {
    /// Returns `true` while the tick source is active.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    /// Returns `true` once the sequence has been exhausted.
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Complete => "complete",
        })
    }
}

/// Mutable countdown state.
///
/// Invariants upheld by the engine:
/// - `status == Running` implies `current_index < len`
/// - `current_index == len` implies `status == Complete`
/// - `remaining_seconds <= phase_total_seconds`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineState {
    /// Index into the sequence; equal to its length once complete.
    pub current_index: usize,
    /// Seconds left in the current phase.
    pub remaining_seconds: u32,
    /// Duration the current phase started with; 0 before any phase starts.
    pub phase_total_seconds: u32,
    /// Lifecycle status.
    pub status: EngineStatus,
}

impl EngineState {
    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    ///
    /// Returns 0 before any phase has started.
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress_fraction(self.remaining_seconds, self.phase_total_seconds)
    }
}

/// Point-in-time copy of the engine state, with the current phase resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    /// Lifecycle status
    pub status: EngineStatus,
    /// Index into the sequence
    pub current_index: usize,
    /// Current phase name, `None` once complete
    pub phase_name: Option<String>,
    /// 1-based step number, `None` once complete
    pub step_number: Option<usize>,
    /// Number of phases in the sequence
    pub step_count: usize,
    /// Seconds left in the current phase
    pub remaining_seconds: u32,
    /// Duration the current phase started with
    pub phase_total_seconds: u32,
    /// Elapsed fraction of the current phase
    pub progress: f64,
}

/// Computes `(total - remaining) / total`, clamped to `[0, 1]`.
///
/// Returns 0 when `total` is 0.
#[must_use]
pub fn progress_fraction(remaining: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let elapsed = f64::from(total) - f64::from(remaining);
    (elapsed / f64::from(total)).clamp(0.0, 1.0)
}

/// Renders seconds as `MM:SS`, each part zero-padded to at least two digits.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
