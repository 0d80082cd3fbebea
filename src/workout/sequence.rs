//! Exercise phases and the immutable workout sequence.
//!
//! A [`WorkoutSequence`] is validated once at construction; the engine
//! relies on it being non-empty with positive durations and never checks
//! again.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WorkoutError;

/// Coarse category of an exercise phase, used by displays for theming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Active exercise.
    #[default]
    Work,
    /// Recovery between exercises.
    Rest,
    /// Opening phase.
    Warmup,
    /// Closing phase.
    Cooldown,
}

impl PhaseKind {
    /// Derives a kind from an exercise name.
    ///
    /// Matching is case-insensitive and ignores spaces, hyphens and
    /// underscores, so `"Warm Up"`, `"warm-up"` and `"WARMUP"` are all
    /// [`PhaseKind::Warmup`]. Anything unrecognised is [`PhaseKind::Work`].
    #[must_use]
    pub fn classify(name: &str) -> Self {
        let folded: String = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "rest" | "recovery" | "break" => Self::Rest,
            "warmup" => Self::Warmup,
            "cooldown" => Self::Cooldown,
            _ => Self::Work,
        }
    }

    /// Returns the lowercase label used in JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Rest => "rest",
            Self::Warmup => "warmup",
            Self::Cooldown => "cooldown",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied description of one exercise, before step numbers are
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseSpec {
    /// Display name
    pub name: String,
    /// Length of the phase in whole seconds
    pub duration_seconds: u32,
    /// Explicit kind; derived from the name when `None`
    pub kind: Option<PhaseKind>,
}

impl ExerciseSpec {
    /// Creates an entry whose kind is derived from its name.
    #[must_use]
    pub fn new(name: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            name: name.into(),
            duration_seconds,
            kind: None,
        }
    }

    /// Sets an explicit kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: PhaseKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// One immutable phase of a workout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExercisePhase {
    name: String,
    duration_seconds: u32,
    step_number: usize,
    kind: PhaseKind,
}

impl ExercisePhase {
    /// Exercise name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Duration in whole seconds, always at least 1.
    #[must_use]
    pub const fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }

    /// 1-based position in the sequence.
    #[must_use]
    pub const fn step_number(&self) -> usize {
        self.step_number
    }

    /// Theming category.
    #[must_use]
    pub const fn kind(&self) -> PhaseKind {
        self.kind
    }
}

/// Ordered, non-empty list of exercise phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct WorkoutSequence {
    phases: Vec<ExercisePhase>,
}

impl WorkoutSequence {
    /// Builds a sequence, assigning step numbers in order.
    ///
    /// # Errors
    ///
    /// Returns [`WorkoutError::EmptySequence`] for an empty list,
    /// [`WorkoutError::BlankName`] for a blank name, and
    /// [`WorkoutError::ZeroDuration`] for a zero-length exercise.
    pub fn new(specs: impl IntoIterator<Item = ExerciseSpec>) -> Result<Self, WorkoutError> {
        let phases = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let step_number = index + 1;
                if spec.name.trim().is_empty() {
                    return Err(WorkoutError::BlankName { step: step_number });
                }
                if spec.duration_seconds == 0 {
                    return Err(WorkoutError::ZeroDuration {
                        step: step_number,
                        name: spec.name,
                    });
                }
                let kind = spec.kind.unwrap_or_else(|| PhaseKind::classify(&spec.name));
                Ok(ExercisePhase {
                    name: spec.name,
                    duration_seconds: spec.duration_seconds,
                    step_number,
                    kind,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if phases.is_empty() {
            return Err(WorkoutError::EmptySequence);
        }

        Ok(Self { phases })
    }

    /// The classic ten-step HIIT routine used when no workout file is given.
    #[must_use]
    pub fn classic_hiit() -> Self {
        let phases = [
            ("Warm Up", 30),
            ("High Knees", 45),
            ("Rest", 15),
            ("Burpees", 45),
            ("Rest", 15),
            ("Jump Squats", 45),
            ("Rest", 15),
            ("Mountain Climbers", 45),
            ("Rest", 15),
            ("Cool Down", 30),
        ]
        .into_iter()
        .enumerate()
        .map(|(index, (name, duration_seconds))| ExercisePhase {
            name: name.to_string(),
            duration_seconds,
            step_number: index + 1,
            kind: PhaseKind::classify(name),
        })
        .collect();
        Self { phases }
    }

    /// Number of phases, always at least 1.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Returns the phase at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ExercisePhase> {
        self.phases.get(index)
    }

    /// Iterates phases in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExercisePhase> {
        self.phases.iter()
    }

    /// Sum of all phase durations in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> u64 {
        self.phases
            .iter()
            .map(|p| u64::from(p.duration_seconds))
            .sum()
    }
}

impl<'a> IntoIterator for &'a WorkoutSequence {
    type Item = &'a ExercisePhase;
    type IntoIter = std::slice::Iter<'a, ExercisePhase>;

    fn into_iter(self) -> Self::IntoIter {
        self.phases.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_numbers_are_contiguous() {
        let seq = WorkoutSequence::new([
            ExerciseSpec::new("A", 2),
            ExerciseSpec::new("B", 1),
            ExerciseSpec::new("C", 5),
        ])
        .unwrap();

        let steps: Vec<usize> = seq.iter().map(ExercisePhase::step_number).collect();
        assert_eq!(steps, vec![1, 2, 3]);
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.total_seconds(), 8);
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let err = WorkoutSequence::new(Vec::new()).unwrap_err();
        assert_eq!(err, WorkoutError::EmptySequence);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err =
            WorkoutSequence::new([ExerciseSpec::new("A", 3), ExerciseSpec::new("B", 0)])
                .unwrap_err();
        assert_eq!(
            err,
            WorkoutError::ZeroDuration {
                step: 2,
                name: "B".to_string()
            }
        );
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = WorkoutSequence::new([ExerciseSpec::new("   ", 3)]).unwrap_err();
        assert_eq!(err, WorkoutError::BlankName { step: 1 });
    }

    #[test]
    fn test_classify_names() {
        assert_eq!(PhaseKind::classify("Rest"), PhaseKind::Rest);
        assert_eq!(PhaseKind::classify("Warm Up"), PhaseKind::Warmup);
        assert_eq!(PhaseKind::classify("warm-up"), PhaseKind::Warmup);
        assert_eq!(PhaseKind::classify("Cool Down"), PhaseKind::Cooldown);
        assert_eq!(PhaseKind::classify("Burpees"), PhaseKind::Work);
    }

    #[test]
    fn test_explicit_kind_wins() {
        let seq =
            WorkoutSequence::new([ExerciseSpec::new("Stretch", 30).with_kind(PhaseKind::Cooldown)])
                .unwrap();
        assert_eq!(seq.get(0).unwrap().kind(), PhaseKind::Cooldown);
    }

    #[test]
    fn test_classic_hiit() {
        let seq = WorkoutSequence::classic_hiit();
        assert_eq!(seq.len(), 10);
        assert_eq!(seq.get(0).unwrap().name(), "Warm Up");
        assert_eq!(seq.get(9).unwrap().name(), "Cool Down");
        assert_eq!(seq.get(9).unwrap().step_number(), 10);
        assert_eq!(seq.total_seconds(), 300);
        assert!(seq.get(10).is_none());
    }
}
