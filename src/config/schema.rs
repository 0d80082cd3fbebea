//! Workout file schema types.
//!
//! These types are deserialized from YAML workout files. They are
//! deliberately permissive (blank names, zero durations and missing lists
//! all parse) so that the validator can report every problem at once.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::workout::PhaseKind;

// ============================================================================
// Top-Level Configuration
// ============================================================================

/// Root of a workout file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutConfig {
    /// Workout-wide settings
    #[serde(default)]
    pub workout: WorkoutSettings,

    /// Ordered exercise list
    #[serde(default)]
    pub exercises: Vec<ExerciseConfig>,

    /// Transition cue; the terminal bell when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<CueConfig>,
}

/// Workout-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkoutSettings {
    /// Display name of the workout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Wall-clock time between ticks, e.g. `"1s"` or `"250ms"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<String>,
}

// ============================================================================
// Exercises
// ============================================================================

/// One exercise entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseConfig {
    /// Display name
    #[serde(default)]
    pub name: String,

    /// Length of the exercise
    pub duration: DurationValue,

    /// Theming category; derived from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<PhaseKind>,
}

/// A duration written either as whole seconds or as human-readable text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    /// Plain integer seconds: `duration: 45`
    Seconds(u64),
    /// Text parsed with `humantime`: `duration: 1m 30s`
    Text(String),
}

impl DurationValue {
    /// Resolves to a [`Duration`].
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if the text is not a valid
    /// `humantime` duration.
    pub fn to_duration(&self) -> Result<Duration, String> {
        match self {
            Self::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            Self::Text(text) => {
                humantime::parse_duration(text.trim()).map_err(|e| format!("'{text}': {e}"))
            }
        }
    }
}

impl std::fmt::Display for DurationValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

// ============================================================================
// Cue
// ============================================================================

/// Transition cue configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CueConfig {
    /// Cue backend
    #[serde(default)]
    pub kind: CueKind,

    /// Command line for [`CueKind::Command`], split shell-style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

/// Cue backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueKind {
    /// Terminal bell on stderr.
    #[default]
    Bell,
    /// No cue.
    None,
    /// External program.
    Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let yaml = r"
workout:
  name: Tabata
  tick_interval: 500ms
exercises:
  - name: Sprint
    duration: 20
  - name: Rest
    duration: 10s
    kind: rest
cue:
  kind: command
  command: paplay beep.wav
";
        let config: WorkoutConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.workout.name.as_deref(), Some("Tabata"));
        assert_eq!(config.exercises.len(), 2);
        assert_eq!(config.exercises[0].duration, DurationValue::Seconds(20));
        assert_eq!(
            config.exercises[1].duration,
            DurationValue::Text("10s".to_string())
        );
        assert_eq!(config.exercises[1].kind, Some(PhaseKind::Rest));
        let cue = config.cue.unwrap();
        assert_eq!(cue.kind, CueKind::Command);
        assert_eq!(cue.command.as_deref(), Some("paplay beep.wav"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "exercises:\n  - name: A\n    duration: 5\n    reps: 10\n";
        assert!(serde_yaml::from_str::<WorkoutConfig>(yaml).is_err());
    }

    #[test]
    fn test_duration_value_resolution() {
        assert_eq!(
            DurationValue::Seconds(45).to_duration().unwrap(),
            Duration::from_secs(45)
        );
        assert_eq!(
            DurationValue::Text("1m 30s".to_string()).to_duration().unwrap(),
            Duration::from_secs(90)
        );
        assert!(DurationValue::Text("soon".to_string()).to_duration().is_err());
    }

    #[test]
    fn test_cue_kind_default_is_bell() {
        assert_eq!(CueConfig::default().kind, CueKind::Bell);
    }
}
