//! Phase-transition cues.
//!
//! A [`Cue`] is played once for every phase boundary the engine crosses,
//! including the final one into completion. Failures are reported to the
//! engine, which logs and ignores them.

use std::io::Write;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::CueError;

/// Alert played on phase transitions.
///
/// Implementations report failures through the returned error and must not
/// panic. The engine still contains a panic and keeps advancing, but the
/// cue is then treated as failed.
pub trait Cue: Send {
    /// Plays the cue.
    ///
    /// # Errors
    ///
    /// Returns a [`CueError`] when the backend cannot play the alert.
    fn play(&mut self) -> Result<(), CueError>;
}

impl<C: Cue + ?Sized> Cue for Box<C> {
    fn play(&mut self) -> Result<(), CueError> {
        (**self).play()
    }
}

/// Parameters of the classic transition beep: a sine tone with an
/// exponential gain ramp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Pitch in hertz
    pub frequency_hz: f32,
    /// Length of the tone
    pub duration: Duration,
    /// Gain at the start of the tone
    pub start_gain: f32,
    /// Gain the ramp decays to at the end
    pub end_gain: f32,
}

impl Tone {
    /// 800 Hz for half a second, decaying from 0.3 to 0.01.
    pub const BEEP: Self = Self {
        frequency_hz: 800.0,
        duration: Duration::from_millis(500),
        start_gain: 0.3,
        end_gain: 0.01,
    };
}

/// Rings the terminal bell by writing `BEL` to a writer.
pub struct BellCue<W: Write + Send> {
    writer: W,
    tone: Tone,
}

impl BellCue<std::io::Stderr> {
    /// Bell on stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> BellCue<W> {
    /// Bell written to `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            tone: Tone::BEEP,
        }
    }

    /// Consumes the cue and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Cue for BellCue<W> {
    fn play(&mut self) -> Result<(), CueError> {
        trace!(
            frequency_hz = self.tone.frequency_hz,
            duration_ms = self.tone.duration.as_millis(),
            "bell"
        );
        self.writer.write_all(b"\x07")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Spawns an external program (e.g. an audio player) for each cue.
///
/// The child is not waited on; the cue returns as soon as it has started.
#[derive(Debug, Clone)]
pub struct CommandCue {
    program: String,
    args: Vec<String>,
}

impl CommandCue {
    /// Creates a cue from a shell-style command line.
    ///
    /// # Errors
    ///
    /// Returns [`CueError::Unavailable`] if the line is empty or has
    /// unbalanced quotes.
    pub fn parse(command_line: &str) -> Result<Self, CueError> {
        let mut words = shlex::split(command_line)
            .ok_or_else(|| CueError::Unavailable(format!("cannot parse '{command_line}'")))?
            .into_iter();
        let program = words
            .next()
            .ok_or_else(|| CueError::Unavailable("empty cue command".to_string()))?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Program name.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Cue for CommandCue {
    fn play(&mut self) -> Result<(), CueError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(CueError::Unavailable(
                "command cue needs a tokio runtime".to_string(),
            ));
        }
        // The child is dropped unwaited; tokio reaps it in the background.
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CueError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        debug!(program = %self.program, pid = child.id(), "cue command spawned");
        Ok(())
    }
}

/// Cue that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentCue;

impl Cue for SilentCue {
    fn play(&mut self) -> Result<(), CueError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_writes_bel() {
        let mut cue = BellCue::new(Vec::new());
        cue.play().unwrap();
        cue.play().unwrap();
        assert_eq!(cue.into_inner(), b"\x07\x07");
    }

    #[test]
    fn test_bell_reports_write_failure() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut cue = BellCue::new(Broken);
        assert!(matches!(cue.play(), Err(CueError::Io(_))));
    }

    #[test]
    fn test_command_cue_parses_quoted_args() {
        let cue = CommandCue::parse("paplay --volume 40000 'beep sound.wav'").unwrap();
        assert_eq!(cue.program(), "paplay");
        assert_eq!(cue.args(), ["--volume", "40000", "beep sound.wav"]);
    }

    #[test]
    fn test_command_cue_rejects_empty() {
        assert!(matches!(
            CommandCue::parse("   "),
            Err(CueError::Unavailable(_))
        ));
        assert!(matches!(
            CommandCue::parse("play 'unterminated"),
            Err(CueError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_command_cue_missing_program() {
        let mut cue = CommandCue::parse("/nonexistent/hiitclock-cue-player").unwrap();
        assert!(matches!(cue.play(), Err(CueError::Spawn { .. })));
    }

    #[test]
    fn test_command_cue_outside_runtime() {
        let mut cue = CommandCue::parse("true").unwrap();
        assert!(matches!(cue.play(), Err(CueError::Unavailable(_))));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_command_cue_does_not_start_threads() {
        fn thread_count() -> usize {
            std::fs::read_dir("/proc/self/task").unwrap().count()
        }

        let mut cue = CommandCue::parse("sleep 2").unwrap();
        let before = thread_count();
        for _ in 0..20 {
            cue.play().unwrap();
        }
        let after = thread_count();
        // Other tests share the process, so allow a little slack.
        assert!(after < before + 5, "threads grew from {before} to {after}");
    }

    #[test]
    fn test_silent_cue() {
        assert!(SilentCue.play().is_ok());
    }

    #[test]
    fn test_beep_tone() {
        assert!((Tone::BEEP.frequency_hz - 800.0).abs() < f32::EPSILON);
        assert_eq!(Tone::BEEP.duration, Duration::from_millis(500));
    }
}
