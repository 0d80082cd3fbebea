//! JSONL display backed by the observability event stream.

use std::sync::Arc;

use chrono::Utc;

use crate::observability::{Event, EventEmitter};
use crate::workout::format_clock;

use super::{PhaseView, WorkoutDisplay};

/// Emits one [`Event`] per engine update.
///
/// A `PhaseEntered` event precedes the first tick of each phase, detected
/// by a change of step number.
#[derive(Debug)]
pub struct JsonDisplay {
    emitter: Arc<EventEmitter>,
    current_step: Option<usize>,
}

impl JsonDisplay {
    /// Display writing through `emitter`.
    #[must_use]
    pub const fn new(emitter: Arc<EventEmitter>) -> Self {
        Self {
            emitter,
            current_step: None,
        }
    }
}

impl WorkoutDisplay for JsonDisplay {
    fn on_tick(&mut self, view: &PhaseView<'_>) {
        let timestamp = Utc::now();
        if self.current_step != Some(view.step_number) {
            self.current_step = Some(view.step_number);
            self.emitter.emit(Event::PhaseEntered {
                timestamp,
                phase_name: view.phase_name.to_string(),
                step_number: view.step_number,
                kind: view.kind,
                duration_seconds: view.phase_total_seconds,
            });
        }
        self.emitter.emit(Event::Tick {
            timestamp,
            remaining_seconds: view.remaining_seconds,
            phase_total_seconds: view.phase_total_seconds,
            clock: format_clock(view.remaining_seconds),
            phase_name: view.phase_name.to_string(),
            step_number: view.step_number,
            step_count: view.step_count,
            progress: view.progress,
        });
    }

    fn on_ready(&mut self) {
        self.current_step = None;
        self.emitter.emit(Event::Ready {
            timestamp: Utc::now(),
            clock: format_clock(0),
            progress: 0.0,
        });
    }

    fn on_complete(&mut self) {
        self.current_step = None;
        self.emitter.emit(Event::Complete {
            timestamp: Utc::now(),
            clock: format_clock(0),
            progress: 1.0,
        });
    }
}
