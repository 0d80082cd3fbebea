//! `run` command: drives a workout in the terminal.
//!
//! The engine runs in its own actor task. This command feeds it control
//! words read from stdin and returns once the workout completes, the user
//! quits, or `shutdown` fires.

use std::io::IsTerminal;
use std::sync::Arc;

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::args::{ColorChoice, OutputFormat, RunArgs};
use crate::config::{CueConfig, CueKind, load_or_classic};
use crate::cue::{BellCue, CommandCue, Cue, SilentCue};
use crate::display::{JsonDisplay, TerminalDisplay, WorkoutDisplay};
use crate::error::HiitError;
use crate::observability::{Event, EventEmitter, ansi_enabled};
use crate::workout::{Control, spawn_engine};

/// One line of interactive input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// An engine control.
    Control(Control),
    /// Leave the workout.
    Quit,
    /// Blank line.
    Empty,
    /// Anything else.
    Unknown,
}

impl Input {
    /// Classifies a line read from stdin.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let word = line.trim();
        if word.is_empty() {
            return Self::Empty;
        }
        if word.eq_ignore_ascii_case("q") || word.eq_ignore_ascii_case("quit") {
            return Self::Quit;
        }
        Control::parse(word).map_or(Self::Unknown, Self::Control)
    }
}

/// Builds the cue for a plan. `disabled` forces silence.
///
/// # Errors
///
/// Returns an error if a command cue cannot be parsed.
pub fn build_cue(config: &CueConfig, disabled: bool) -> Result<Box<dyn Cue>, HiitError> {
    if disabled {
        return Ok(Box::new(SilentCue));
    }
    Ok(match config.kind {
        CueKind::Bell => Box::new(BellCue::stderr()),
        CueKind::None => Box::new(SilentCue),
        CueKind::Command => {
            let line = config.command.as_deref().unwrap_or_default();
            Box::new(CommandCue::parse(line)?)
        }
    })
}

/// Run a workout until it completes or the user leaves.
///
/// # Errors
///
/// Returns an error if the workout cannot be loaded or stdin fails.
pub async fn run(
    args: &RunArgs,
    color: ColorChoice,
    quiet: bool,
    shutdown: CancellationToken,
) -> Result<(), HiitError> {
    let result = load_or_classic(args.config.as_ref())?;
    for warning in &result.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }
    let plan = result.plan;
    info!(
        workout = %plan.name,
        steps = plan.sequence.len(),
        total_seconds = plan.sequence.total_seconds(),
        tick_interval = ?plan.tick_interval,
        "workout loaded"
    );

    let emitter = match args.format {
        OutputFormat::Json => Some(Arc::new(EventEmitter::stdout())),
        OutputFormat::Human => None,
    };
    let display: Box<dyn WorkoutDisplay> = match &emitter {
        Some(emitter) => Box::new(JsonDisplay::new(Arc::clone(emitter))),
        None => Box::new(TerminalDisplay::stdout(ansi_enabled(
            color,
            std::io::stdout().is_terminal(),
        ))),
    };
    let cue = build_cue(&plan.cue, args.no_cue)?;

    let stdin_interactive = std::io::stdin().is_terminal();
    if !quiet && emitter.is_none() && stdin_interactive {
        eprintln!("{}: s = start, p = pause, r = reset, q = quit", plan.name);
    }

    let engine_cancel = shutdown.child_token();
    let (handle, task) = spawn_engine(
        plan.sequence,
        display,
        cue,
        plan.tick_interval,
        engine_cancel.clone(),
    );

    let send = |control: Control| {
        if let Some(emitter) = &emitter {
            emitter.emit(Event::Control {
                timestamp: Utc::now(),
                control: control.as_str().to_string(),
            });
        }
        handle.send(control);
    };

    if args.autostart {
        send(Control::Start);
    }

    let mut status = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                debug!("shutdown requested");
                break;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                if status.borrow_and_update().is_complete() {
                    info!("workout complete");
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match Input::parse(&line) {
                    Input::Control(control) => send(control),
                    Input::Quit => {
                        info!("quit requested");
                        break;
                    }
                    Input::Empty => {}
                    Input::Unknown => warn!(input = line.trim(), "unknown command"),
                },
                None => {
                    stdin_open = false;
                    // Snapshot is ordered after every control already sent.
                    let running = handle
                        .snapshot()
                        .await
                        .is_some_and(|snapshot| snapshot.status.is_running());
                    if !running {
                        debug!("stdin closed with the workout paused");
                        break;
                    }
                }
            },
        }
    }

    engine_cancel.cancel();
    if let Err(e) = task.await {
        warn!(error = %e, "engine task failed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_parse() {
        assert_eq!(Input::parse("go\n"), Input::Control(Control::Start));
        assert_eq!(Input::parse(" P "), Input::Control(Control::Stop));
        assert_eq!(Input::parse("reset"), Input::Control(Control::Reset));
        assert_eq!(Input::parse("Q"), Input::Quit);
        assert_eq!(Input::parse("quit"), Input::Quit);
        assert_eq!(Input::parse("   "), Input::Empty);
        assert_eq!(Input::parse("jump"), Input::Unknown);
    }

    #[test]
    fn test_build_cue_disabled() {
        let config = CueConfig {
            kind: CueKind::Command,
            command: None,
        };
        assert!(build_cue(&config, true).is_ok());
    }

    #[test]
    fn test_build_cue_empty_command() {
        let config = CueConfig {
            kind: CueKind::Command,
            command: Some(String::new()),
        };
        assert!(matches!(
            build_cue(&config, false),
            Err(HiitError::Cue(_))
        ));
    }

    #[test]
    fn test_build_cue_command() {
        let config = CueConfig {
            kind: CueKind::Command,
            command: Some("paplay beep.wav".to_string()),
        };
        assert!(build_cue(&config, false).is_ok());
    }
}
