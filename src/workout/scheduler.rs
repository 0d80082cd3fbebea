//! Periodic tick sources.
//!
//! The engine never owns a timer directly. It asks a [`Scheduler`] for a
//! tick source when it starts running and cancels the returned
//! [`TickHandle`] when it stops, resets, or completes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Default tick period: one second per countdown step.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellation handle for an active tick source.
///
/// Each handle carries a generation number so that ticks delivered by a
/// source that has since been cancelled can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct TickHandle {
    generation: u64,
    cancel: CancellationToken,
}

impl TickHandle {
    /// Creates a handle for the given generation.
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cancel: CancellationToken::new(),
        }
    }

    /// Generation number identifying this tick source.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Stops the tick source. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns whether the source has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token observed by the task driving this source.
    #[must_use]
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Factory for periodic tick sources.
pub trait Scheduler: Send {
    /// Begins firing ticks every `period` until the returned handle is
    /// cancelled. The first tick fires one full period after scheduling.
    fn schedule(&mut self, period: Duration) -> TickHandle;
}

/// Callback invoked with the generation of the source that fired.
pub type TickCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Tokio-backed scheduler: one `interval_at` task per tick source.
pub struct IntervalScheduler {
    on_tick: TickCallback,
    next_generation: u64,
}

impl IntervalScheduler {
    /// Creates a scheduler that calls `on_tick` from a spawned task.
    #[must_use]
    pub fn new(on_tick: impl Fn(u64) + Send + Sync + 'static) -> Self {
        Self {
            on_tick: Arc::new(on_tick),
            next_generation: 1,
        }
    }
}

impl Scheduler for IntervalScheduler {
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    fn schedule(&mut self, period: Duration) -> TickHandle {
        let handle = TickHandle::new(self.next_generation);
        self.next_generation += 1;

        let token = handle.token();
        let generation = handle.generation();
        let on_tick = Arc::clone(&self.on_tick);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        debug!(generation, "tick source cancelled");
                        break;
                    }
                    _ = interval.tick() => {
                        trace!(generation, "tick");
                        on_tick(generation);
                    }
                }
            }
        });

        handle
    }
}

impl std::fmt::Debug for IntervalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalScheduler")
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}

/// Scheduler that never fires on its own.
///
/// For hosts that call [`WorkoutEngine::tick`](super::WorkoutEngine::tick)
/// themselves, and for tests. Clones share the same record of issued
/// handles.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualRecord>>,
}

#[derive(Debug, Default)]
struct ManualRecord {
    handles: Vec<TickHandle>,
    last_period: Option<Duration>,
}

impl ManualScheduler {
    /// Creates an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tick sources ever scheduled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn scheduled_count(&self) -> usize {
        self.inner.lock().expect("scheduler lock poisoned").handles.len()
    }

    /// Number of tick sources not yet cancelled.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.inner
            .lock()
            .expect("scheduler lock poisoned")
            .handles
            .iter()
            .filter(|h| !h.is_cancelled())
            .count()
    }

    /// Period requested by the most recent `schedule` call.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn last_period(&self) -> Option<Duration> {
        self.inner.lock().expect("scheduler lock poisoned").last_period
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, period: Duration) -> TickHandle {
        let mut record = self.inner.lock().expect("scheduler lock poisoned");
        let handle = TickHandle::new(record.handles.len() as u64 + 1);
        record.handles.push(handle.clone());
        record.last_period = Some(period);
        handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_handle_cancel_idempotent() {
        let handle = TickHandle::new(7);
        assert_eq!(handle.generation(), 7);
        assert!(!handle.is_cancelled());
        handle.cancel();
        handle.cancel();
        assert!(handle.is_cancelled());
    }

    #[test]
    fn test_manual_scheduler_tracks_handles() {
        let mut scheduler = ManualScheduler::new();
        let probe = scheduler.clone();

        let first = scheduler.schedule(Duration::from_secs(1));
        let second = scheduler.schedule(Duration::from_millis(250));
        assert_eq!(probe.scheduled_count(), 2);
        assert_eq!(probe.active_count(), 2);
        assert_eq!(probe.last_period(), Some(Duration::from_millis(250)));
        assert_ne!(first.generation(), second.generation());

        first.cancel();
        assert_eq!(probe.active_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_fires_each_period() {
        let fired = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&fired);
        let mut scheduler = IntervalScheduler::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handle = scheduler.schedule(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0, "first tick is one period out");

        tokio::time::sleep(Duration::from_millis(2600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 3, "no ticks after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_scheduler_passes_generation() {
        let seen = Arc::new(AtomicU64::new(0));
        let sink = Arc::clone(&seen);
        let mut scheduler = IntervalScheduler::new(move |generation| {
            sink.store(generation, Ordering::SeqCst);
        });

        scheduler.schedule(Duration::from_secs(1)).cancel();
        let second = scheduler.schedule(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(seen.load(Ordering::SeqCst), second.generation());
        second.cancel();
    }
}
