//! Error types for `hiitclock`
//!
//! This module provides the error hierarchy used by the workout engine,
//! configuration loading, cues, and the CLI exit-code mapping.

use std::path::PathBuf;
use thiserror::Error;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `hiitclock` CLI operations.
///
/// These codes follow Unix conventions.
pub struct ExitCode;

impl ExitCode {
    /// Successful execution
    pub const SUCCESS: i32 = 0;

    /// General error
    pub const ERROR: i32 = 1;

    /// Configuration error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Workout construction error (empty sequence, zero duration)
    pub const WORKOUT_ERROR: i32 = 5;

    /// Interrupted by SIGINT (Ctrl+C)
    pub const INTERRUPTED: i32 = 130;

    /// Terminated by SIGTERM
    pub const TERMINATED: i32 = 143;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `hiitclock` operations.
///
/// Aggregates the domain-specific errors and maps each onto an exit code.
#[derive(Debug, Error)]
pub enum HiitError {
    /// Configuration loading or validation error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workout sequence could not be built
    #[error(transparent)]
    Workout(#[from] WorkoutError),

    /// Cue backend could not be set up
    #[error(transparent)]
    Cue(#[from] CueError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HiitError {
    /// Returns the appropriate exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Workout(_) => ExitCode::WORKOUT_ERROR,
            Self::Io(_) => ExitCode::IO_ERROR,
            Self::Cue(_) => ExitCode::ERROR,
        }
    }
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Workout file loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the workout file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Workout file validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the workout file
        path: String,
        /// List of validation issues found
        errors: Vec<ValidationIssue>,
    },

    /// Referenced workout file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Workout file exceeds the configured size limit
    #[error("file too large: {path} is {size} bytes (limit: {limit})")]
    FileTooLarge {
        /// Path to the oversized file
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// Field has an invalid value
    #[error("invalid value for '{field}': got '{value}', expected {expected}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The actual value provided
        value: String,
        /// Description of what was expected
        expected: String,
    },
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found while validating a workout file.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Path to the problematic field (e.g., "exercises[2].duration")
    pub path: String,
    /// Description of the validation issue
    pub message: String,
    /// Severity level of the issue
    pub severity: Severity,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {} at {}", prefix, self.message, self.path)
    }
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Error - the workout file cannot be used
    Error,
    /// Warning - suspicious but usable
    Warning,
}

// ============================================================================
// Workout Errors
// ============================================================================

/// Errors raised when building a workout sequence.
///
/// These are the only fatal errors of the engine; once a sequence exists,
/// every engine operation is total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkoutError {
    /// The exercise list was empty
    #[error("workout must contain at least one exercise")]
    EmptySequence,

    /// An exercise had a zero duration
    #[error("exercise {step} ('{name}') must last at least one second")]
    ZeroDuration {
        /// 1-based step number of the offending exercise
        step: usize,
        /// Exercise name
        name: String,
    },

    /// An exercise had an empty or whitespace-only name
    #[error("exercise {step} has a blank name")]
    BlankName {
        /// 1-based step number of the offending exercise
        step: usize,
    },
}

// ============================================================================
// Cue Errors
// ============================================================================

/// Failures of a phase-transition cue.
///
/// The engine logs and discards these; they never reach the caller.
#[derive(Debug, Error)]
pub enum CueError {
    /// Writing the cue to its output failed
    #[error("cue I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The external cue program could not be started
    #[error("failed to spawn cue command '{program}': {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The cue backend is not available
    #[error("cue backend unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `hiitclock` operations.
pub type Result<T> = std::result::Result<T, HiitError>;

// ============================================================================
// Tests
// ============================================================================
