//! Structured event stream for `hiitclock`.
//!
//! Discrete, typed events emitted while a workout runs. Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::workout::PhaseKind;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a workout.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The engine is idle at the first phase.
    Ready {
        /// When the engine became ready.
        timestamp: DateTime<Utc>,
        /// Remaining time, always `"00:00"`.
        clock: String,
        /// Progress, always 0.
        progress: f64,
    },

    /// A new phase has begun counting down.
    PhaseEntered {
        /// When the phase was entered.
        timestamp: DateTime<Utc>,
        /// Name of the phase.
        phase_name: String,
        /// 1-based step number.
        step_number: usize,
        /// Theming category.
        kind: PhaseKind,
        /// Length of the phase in seconds.
        duration_seconds: u32,
    },

    /// Countdown update.
    Tick {
        /// When the update was produced.
        timestamp: DateTime<Utc>,
        /// Seconds left in the phase.
        remaining_seconds: u32,
        /// Duration the phase started with.
        phase_total_seconds: u32,
        /// Remaining time as `MM:SS`.
        clock: String,
        /// Name of the phase.
        phase_name: String,
        /// 1-based step number.
        step_number: usize,
        /// Number of phases.
        step_count: usize,
        /// Elapsed fraction of the phase.
        progress: f64,
    },

    /// The last phase has finished.
    Complete {
        /// When the workout finished.
        timestamp: DateTime<Utc>,
        /// Remaining time, always `"00:00"`.
        clock: String,
        /// Progress, always 1.
        progress: f64,
    },

    /// A control trigger was received from the user.
    Control {
        /// When the trigger arrived.
        timestamp: DateTime<Utc>,
        /// `"start"`, `"stop"`, or `"reset"`.
        control: String,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// so a closed pipe never stops the workout.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
