//! Workout file validation
//!
//! Runs on the deserialized [`WorkoutConfig`] and collects ALL problems
//! rather than stopping at the first, so a user can fix a file in one pass.

use std::time::Duration;

use crate::config::loader::ConfigLimits;
use crate::config::schema::{CueKind, WorkoutConfig};
use crate::error::{Severity, ValidationIssue};
use crate::workout::DEFAULT_TICK_PERIOD;

/// Exercises longer than this draw a warning.
pub const LONG_EXERCISE: Duration = Duration::from_secs(60 * 60);

// ============================================================================
// Public API
// ============================================================================

/// Result of workout file validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Workout file validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a workout file.
    pub fn validate(&mut self, config: &WorkoutConfig, limits: &ConfigLimits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_settings(config);
        self.validate_exercises(config, limits);
        self.validate_cue(config);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_settings(&mut self, config: &WorkoutConfig) {
        let Some(interval) = &config.workout.tick_interval else {
            return;
        };
        match humantime::parse_duration(interval.trim()) {
            Ok(d) if d.is_zero() => {
                self.add_error("workout.tick_interval", "tick interval must be positive");
            }
            Ok(d) if d != DEFAULT_TICK_PERIOD => self.add_warning(
                "workout.tick_interval",
                &format!(
                    "each countdown second lasts {}; use 1s for real time",
                    humantime::format_duration(d)
                ),
            ),
            Ok(_) => {}
            Err(e) => self.add_error(
                "workout.tick_interval",
                &format!("invalid duration '{interval}': {e}"),
            ),
        }
    }

    fn validate_exercises(&mut self, config: &WorkoutConfig, limits: &ConfigLimits) {
        if config.exercises.is_empty() {
            self.add_error("exercises", "workout must contain at least one exercise");
            return;
        }

        if config.exercises.len() > limits.max_exercises {
            self.add_error(
                "exercises",
                &format!(
                    "{} exercises exceeds the limit of {}",
                    config.exercises.len(),
                    limits.max_exercises
                ),
            );
        }

        for (i, exercise) in config.exercises.iter().enumerate() {
            if exercise.name.trim().is_empty() {
                self.add_error(&format!("exercises[{i}].name"), "name must not be blank");
            }

            let path = format!("exercises[{i}].duration");
            match exercise.duration.to_duration() {
                Err(e) => self.add_error(&path, &format!("invalid duration {e}")),
                Ok(d) if d.is_zero() => {
                    self.add_error(&path, "duration must be at least one second");
                }
                Ok(d) if d.subsec_nanos() != 0 => {
                    self.add_error(&path, "duration must be a whole number of seconds");
                }
                Ok(d) if d.as_secs() > u64::from(u32::MAX) => {
                    self.add_error(&path, "duration is too large");
                }
                Ok(d) if d > LONG_EXERCISE => {
                    self.add_warning(&path, "exercise lasts longer than one hour");
                }
                Ok(_) => {}
            }
        }
    }

    fn validate_cue(&mut self, config: &WorkoutConfig) {
        let Some(cue) = &config.cue else {
            return;
        };
        let has_command = cue
            .command
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        match cue.kind {
            CueKind::Command if !has_command => {
                self.add_error("cue.command", "command cue requires a command");
            }
            CueKind::Command => {
                if cue.command.as_deref().and_then(shlex::split).is_none() {
                    self.add_error("cue.command", "command has unbalanced quotes");
                }
            }
            CueKind::Bell | CueKind::None if has_command => {
                self.add_warning("cue.command", "command is ignored unless kind is 'command'");
            }
            CueKind::Bell | CueKind::None => {}
        }
    }

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
