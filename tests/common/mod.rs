//! Shared integration-test helpers: running the `hiitclock` binary and
//! recording what an engine reports.

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};

use hiitclock::cue::Cue;
use hiitclock::display::{PhaseView, WorkoutDisplay};
use hiitclock::error::CueError;

/// Absolute path of a file under `tests/fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs the binary with `args` and closed stdin.
#[allow(clippy::missing_panics_doc)]
pub fn run_cli(args: &[&str]) -> Output {
    run_cli_with_stdin(args, "")
}

/// Runs the binary with `args`, writing `input` to its stdin then closing it.
#[allow(clippy::missing_panics_doc)]
pub fn run_cli_with_stdin(args: &[&str], input: &str) -> Output {
    let bin = env!("CARGO_BIN_EXE_hiitclock");
    let mut child = Command::new(bin)
        .args(args)
        .env_remove("HIITCLOCK_WORKOUT")
        .env_remove("HIITCLOCK_LOG_LEVEL")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn hiitclock");

    {
        let mut stdin = child.stdin.take().expect("stdin not captured");
        // The child may already have exited
        let _ = stdin.write_all(input.as_bytes());
    }

    child.wait_with_output().expect("failed to wait for hiitclock")
}

/// Parses every stdout line as JSON.
#[allow(clippy::missing_panics_doc)]
pub fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad JSON line {l:?}: {e}")))
        .collect()
}

/// The `type` field of each event.
pub fn event_types(events: &[serde_json::Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect()
}

/// One call received by a [`RecordingDisplay`] or [`RecordingCue`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Ready,
    Tick {
        step: usize,
        remaining: u32,
        total: u32,
        progress: f64,
    },
    Complete,
    Cue,
}

/// Shared, ordered log of calls.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == wanted).count()
    }

    pub fn ticks(&self) -> Vec<Call> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::Tick { .. }))
            .cloned()
            .collect()
    }

    /// Display and cue that both write to this log.
    pub fn recorders(&self) -> (RecordingDisplay, RecordingCue) {
        (RecordingDisplay(self.clone()), RecordingCue(self.clone()))
    }
}

pub struct RecordingDisplay(pub CallLog);

impl WorkoutDisplay for RecordingDisplay {
    fn on_tick(&mut self, view: &PhaseView<'_>) {
        self.0.push(Call::Tick {
            step: view.step_number,
            remaining: view.remaining_seconds,
            total: view.phase_total_seconds,
            progress: view.progress,
        });
    }

    fn on_ready(&mut self) {
        self.0.push(Call::Ready);
    }

    fn on_complete(&mut self) {
        self.0.push(Call::Complete);
    }
}

pub struct RecordingCue(pub CallLog);

impl Cue for RecordingCue {
    fn play(&mut self) -> Result<(), CueError> {
        self.0.push(Call::Cue);
        Ok(())
    }
}
