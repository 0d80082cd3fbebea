//! Engine actor.
//!
//! Runs a [`WorkoutEngine`] inside one tokio task that owns it exclusively.
//! Control calls and ticks arrive through a single mailbox and are applied
//! strictly in order, so no tick can ever run concurrently with a
//! start, stop, or reset.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::cue::Cue;
use crate::display::WorkoutDisplay;

use super::engine::WorkoutEngine;
use super::scheduler::IntervalScheduler;
use super::sequence::WorkoutSequence;
use super::state::{EngineSnapshot, EngineStatus};

/// Caller-facing control triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Start or resume the countdown.
    Start,
    /// Pause the countdown.
    Stop,
    /// Return to the first phase.
    Reset,
}

impl Control {
    /// Parses an interactive command word.
    ///
    /// Accepts `s`/`start`/`go`, `p`/`stop`/`pause`, `r`/`reset`
    /// (case-insensitive).
    #[must_use]
    pub fn parse(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "s" | "start" | "go" => Some(Self::Start),
            "p" | "stop" | "pause" => Some(Self::Stop),
            "r" | "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    /// Lowercase name used in logs and events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Reset => "reset",
        }
    }
}

enum Command {
    Control(Control),
    Tick(u64),
    Snapshot(oneshot::Sender<EngineSnapshot>),
}

/// Cloneable handle for sending controls to a running engine actor.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    mailbox: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<EngineStatus>,
}

impl EngineHandle {
    /// Sends a control trigger. Silently dropped once the actor has exited.
    pub fn send(&self, control: Control) {
        let _ = self.mailbox.send(Command::Control(control));
    }

    /// Starts or resumes the countdown.
    pub fn start(&self) {
        self.send(Control::Start);
    }

    /// Pauses the countdown.
    pub fn stop(&self) {
        self.send(Control::Stop);
    }

    /// Returns to the first phase.
    pub fn reset(&self) {
        self.send(Control::Reset);
    }

    /// Requests a snapshot after every previously sent command has been
    /// applied. Returns `None` once the actor has exited.
    pub async fn snapshot(&self) -> Option<EngineSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.mailbox.send(Command::Snapshot(tx)).ok()?;
        rx.await.ok()
    }

    /// Latest published status.
    #[must_use]
    pub fn status(&self) -> EngineStatus {
        *self.status.borrow()
    }

    /// Watch channel that changes whenever the status does.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineStatus> {
        self.status.clone()
    }
}

/// Builds an engine driven by a tokio interval and spawns its actor task.
///
/// The task exits when `cancel` is cancelled or every [`EngineHandle`]
/// has been dropped; the engine (and its tick source) is dropped with it.
///
/// # Panics
///
/// Panics if called outside a tokio runtime.
pub fn spawn_engine(
    sequence: WorkoutSequence,
    display: impl WorkoutDisplay + 'static,
    cue: impl Cue + 'static,
    tick_period: Duration,
    cancel: CancellationToken,
) -> (EngineHandle, JoinHandle<()>) {
    let (mailbox, mut inbox) = mpsc::unbounded_channel();

    // Ticks hold a weak sender so a live tick source alone cannot keep the
    // actor alive after every handle is gone.
    let tick_sender = mailbox.downgrade();
    let scheduler = IntervalScheduler::new(move |generation| {
        if let Some(tx) = tick_sender.upgrade() {
            let _ = tx.send(Command::Tick(generation));
        }
    });

    let mut engine =
        WorkoutEngine::new(sequence, display, cue, scheduler).with_tick_period(tick_period);
    let (status_tx, status_rx) = watch::channel(engine.status());

    let task = tokio::spawn(async move {
        loop {
            let command = tokio::select! {
                () = cancel.cancelled() => {
                    debug!("engine actor cancelled");
                    break;
                }
                command = inbox.recv() => command,
            };
            let Some(command) = command else {
                debug!("all engine handles dropped");
                break;
            };

            match command {
                Command::Control(control) => {
                    debug!(control = control.as_str(), "control received");
                    match control {
                        Control::Start => engine.start(),
                        Control::Stop => engine.stop(),
                        Control::Reset => engine.reset(),
                    }
                }
                Command::Tick(generation) => {
                    if engine.tick_generation() == Some(generation) {
                        engine.tick();
                    } else {
                        trace!(generation, "stale tick dropped");
                    }
                }
                Command::Snapshot(reply) => {
                    let _ = reply.send(engine.snapshot());
                }
            }

            status_tx.send_if_modified(|status| {
                let changed = *status != engine.status();
                *status = engine.status();
                changed
            });
        }
    });

    (
        EngineHandle {
            mailbox,
            status: status_rx,
        },
        task,
    )
}
