//! Workout file loader
//!
//! Loading pipeline:
//! 1. Size check
//! 2. YAML parsing into [`WorkoutConfig`]
//! 3. Validation (all issues collected)
//! 4. Conversion into a [`WorkoutPlan`]

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::schema::{CueConfig, WorkoutConfig};
use crate::config::validation::Validator;
use crate::error::ConfigError;
use crate::workout::{DEFAULT_TICK_PERIOD, ExerciseSpec, WorkoutSequence};

// ============================================================================
// Public API
// ============================================================================

/// Name given to workouts that do not set one.
pub const DEFAULT_WORKOUT_NAME: &str = "HIIT";

/// Options for the workout loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for workout file size.
    pub limits: ConfigLimits,
}

/// Limits that keep a workout file from exhausting memory.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum number of exercises.
    pub max_exercises: usize,

    /// Maximum workout file size in bytes.
    pub max_config_size: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_exercises: env_or("HIITCLOCK_MAX_EXERCISES", 500),
            max_config_size: env_or("HIITCLOCK_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// A workout ready to run: the validated sequence plus runtime settings.
#[derive(Debug, Clone)]
pub struct WorkoutPlan {
    /// Display name
    pub name: String,
    /// Exercise sequence
    pub sequence: WorkoutSequence,
    /// Wall-clock time between ticks
    pub tick_interval: Duration,
    /// Transition cue settings
    pub cue: CueConfig,
}

impl WorkoutPlan {
    /// The built-in ten-step routine with a one-second tick and the bell.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            name: DEFAULT_WORKOUT_NAME.to_string(),
            sequence: WorkoutSequence::classic_hiit(),
            tick_interval: DEFAULT_TICK_PERIOD,
            cue: CueConfig::default(),
        }
    }
}

/// Result of loading a workout file.
#[derive(Debug)]
pub struct LoadResult {
    /// The plan built from the file.
    pub plan: WorkoutPlan,

    /// Non-fatal issues found during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during workout loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Workout file loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    /// Creates a loader with the given options.
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    /// Loads and validates a workout file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or too large, if YAML
    /// parsing fails, or if validation finds any error.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.limits.max_config_size;
        if metadata.len() > limit {
            return Err(ConfigError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&raw, path)
    }

    /// Parses and validates workout YAML already in memory.
    ///
    /// `origin` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if YAML parsing fails or validation finds any error.
    pub fn load_str(&self, raw: &str, origin: &Path) -> Result<LoadResult, ConfigError> {
        let config = parse(raw, origin)?;

        let result = Validator::new().validate(&config, &self.options.limits);
        if result.has_errors() {
            return Err(ConfigError::ValidationError {
                path: origin.display().to_string(),
                errors: result.errors,
            });
        }

        let warnings = result
            .warnings
            .into_iter()
            .map(|issue| LoadWarning {
                message: issue.message,
                location: Some(issue.path),
            })
            .collect();

        Ok(LoadResult {
            plan: into_plan(config)?,
            warnings,
        })
    }
}

/// Parses workout YAML without validating it.
///
/// # Errors
///
/// Returns [`ConfigError::ParseError`] for malformed or empty YAML.
pub fn parse(raw: &str, origin: &Path) -> Result<WorkoutConfig, ConfigError> {
    // Handle UTF-8 BOM
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    if raw.trim().is_empty() {
        return Err(ConfigError::ParseError {
            path: origin.to_path_buf(),
            line: None,
            message: "workout file is empty".to_string(),
        });
    }

    serde_yaml::from_str(raw).map_err(|e| ConfigError::ParseError {
        path: origin.to_path_buf(),
        line: e.location().map(|l| l.line()),
        message: e.to_string(),
    })
}

/// Converts a validated config into a plan.
fn into_plan(config: WorkoutConfig) -> Result<WorkoutPlan, ConfigError> {
    let tick_interval = match &config.workout.tick_interval {
        Some(text) => {
            humantime::parse_duration(text.trim()).map_err(|e| ConfigError::InvalidValue {
                field: "workout.tick_interval".to_string(),
                value: text.clone(),
                expected: format!("a duration ({e})"),
            })?
        }
        None => DEFAULT_TICK_PERIOD,
    };

    let specs = config
        .exercises
        .into_iter()
        .enumerate()
        .map(|(i, exercise)| {
            let invalid = |value: String| ConfigError::InvalidValue {
                field: format!("exercises[{i}].duration"),
                value,
                expected: "whole seconds between 1 and 4294967295".to_string(),
            };
            let duration = exercise.duration.to_duration().map_err(invalid)?;
            let seconds =
                u32::try_from(duration.as_secs()).map_err(|_| invalid(exercise.duration.to_string()))?;
            let spec = ExerciseSpec::new(exercise.name, seconds);
            Ok(match exercise.kind {
                Some(kind) => spec.with_kind(kind),
                None => spec,
            })
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let sequence = WorkoutSequence::new(specs).map_err(|e| ConfigError::InvalidValue {
        field: "exercises".to_string(),
        value: e.to_string(),
        expected: "a non-empty list of exercises with positive durations".to_string(),
    })?;

    Ok(WorkoutPlan {
        name: config
            .workout
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_WORKOUT_NAME.to_string()),
        sequence,
        tick_interval,
        cue: config.cue.unwrap_or_default(),
    })
}

/// Reads a numeric limit from the environment, falling back to `default`.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Loads `path` if given, otherwise returns the classic plan.
///
/// # Errors
///
/// Propagates any loader error for an explicit path.
pub fn load_or_classic(path: Option<&PathBuf>) -> Result<LoadResult, ConfigError> {
    path.map_or_else(
        || {
            Ok(LoadResult {
                plan: WorkoutPlan::classic(),
                warnings: Vec::new(),
            })
        },
        |p| ConfigLoader::default().load(p),
    )
}
