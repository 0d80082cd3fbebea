//! `show` command: prints the steps of a workout.

use std::fmt::Write as _;

use tracing::warn;

use crate::cli::args::{OutputFormat, ShowArgs};
use crate::config::{WorkoutPlan, load_or_classic};
use crate::error::HiitError;
use crate::workout::format_clock;

/// Load the workout and print its plan to stdout.
///
/// # Errors
///
/// Returns an error if the workout file cannot be loaded.
pub fn run(args: &ShowArgs) -> Result<(), HiitError> {
    let result = load_or_classic(args.config.as_ref())?;
    for warning in &result.warnings {
        warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let output = match args.format {
        OutputFormat::Human => render_human(&result.plan),
        OutputFormat::Json => serde_json::to_string_pretty(&render_json(&result.plan))?,
    };
    println!("{output}");
    Ok(())
}

fn clock_u64(seconds: u64) -> String {
    format_clock(u32::try_from(seconds).unwrap_or(u32::MAX))
}

/// Human-readable plan listing.
#[must_use]
pub fn render_human(plan: &WorkoutPlan) -> String {
    let sequence = &plan.sequence;
    let name_width = sequence.iter().map(|p| p.name().len()).max().unwrap_or(0);

    let mut out = format!(
        "{} ({} steps, {} total)\n",
        plan.name,
        sequence.len(),
        clock_u64(sequence.total_seconds())
    );
    for phase in sequence {
        let _ = writeln!(
            out,
            "{:>3}. {:<name_width$}  {}  {}",
            phase.step_number(),
            phase.name(),
            format_clock(phase.duration_seconds()),
            phase.kind()
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Machine-readable plan.
#[must_use]
pub fn render_json(plan: &WorkoutPlan) -> serde_json::Value {
    let steps: Vec<serde_json::Value> = plan
        .sequence
        .iter()
        .map(|phase| {
            serde_json::json!({
                "step": phase.step_number(),
                "name": phase.name(),
                "duration_seconds": phase.duration_seconds(),
                "kind": phase.kind(),
            })
        })
        .collect();

    serde_json::json!({
        "name": plan.name,
        "tick_interval_ms": u64::try_from(plan.tick_interval.as_millis()).unwrap_or(u64::MAX),
        "total_seconds": plan.sequence.total_seconds(),
        "steps": steps,
    })
}
