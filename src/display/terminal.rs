//! Line-oriented terminal display.

use std::io::Write;

use tracing::debug;

use crate::workout::{PhaseKind, format_clock};

use super::{PhaseView, WorkoutDisplay};

/// Number of cells in the progress bar.
pub const BAR_WIDTH: usize = 20;

const RESET: &str = "\x1b[0m";

/// Truecolor foreground escape for a phase kind.
///
/// Rest is blue, warm-up and cool-down are gold, work is green.
#[must_use]
pub const fn kind_color(kind: PhaseKind) -> &'static str {
    match kind {
        PhaseKind::Rest => "\x1b[1;38;2;74;144;226m",
        PhaseKind::Warmup | PhaseKind::Cooldown => "\x1b[1;38;2;255;215;0m",
        PhaseKind::Work => "\x1b[1;38;2;0;255;136m",
    }
}

/// Renders a progress fraction as `[####......]  40%`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn progress_bar(progress: f64, width: usize) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let filled = ((progress * width as f64).round() as usize).min(width);
    let percent = (progress * 100.0).round() as u32;
    format!(
        "[{}{}] {percent:>3}%",
        "#".repeat(filled),
        ".".repeat(width - filled)
    )
}

/// Writes one line per engine update to a writer (stdout by default).
pub struct TerminalDisplay<W: Write + Send> {
    writer: W,
    color: bool,
}

impl TerminalDisplay<std::io::Stdout> {
    /// Display on stdout.
    #[must_use]
    pub fn stdout(color: bool) -> Self {
        Self::new(std::io::stdout(), color)
    }
}

impl<W: Write + Send> TerminalDisplay<W> {
    /// Display on `writer`, with ANSI colors when `color` is set.
    pub const fn new(writer: W, color: bool) -> Self {
        Self { writer, color }
    }

    /// Consumes the display and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Renders the line for a countdown update.
    #[must_use]
    pub fn render_tick(&self, view: &PhaseView<'_>) -> String {
        let clock = format_clock(view.remaining_seconds);
        let clock = if self.color {
            format!("{}{clock}{RESET}", kind_color(view.kind))
        } else {
            clock
        };
        format!(
            "Step {} of {} | {} | {clock} {}",
            view.step_number,
            view.step_count,
            view.phase_name,
            progress_bar(view.progress, BAR_WIDTH)
        )
    }

    /// Renders the neutral ready line.
    #[must_use]
    pub fn render_ready() -> String {
        format!(
            "Ready to Start | Press GO to begin | {} {}",
            format_clock(0),
            progress_bar(0.0, BAR_WIDTH)
        )
    }

    /// Renders the completion line.
    #[must_use]
    pub fn render_complete() -> String {
        format!(
            "Workout Complete! | Great job! | {} {}",
            format_clock(0),
            progress_bar(1.0, BAR_WIDTH)
        )
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}").and_then(|()| self.writer.flush()) {
            debug!(error = %e, "display write failed");
        }
    }
}

impl<W: Write + Send> WorkoutDisplay for TerminalDisplay<W> {
    fn on_tick(&mut self, view: &PhaseView<'_>) {
        let line = self.render_tick(view);
        self.write_line(&line);
    }

    fn on_ready(&mut self) {
        self.write_line(&Self::render_ready());
    }

    fn on_complete(&mut self) {
        self.write_line(&Self::render_complete());
    }
}
