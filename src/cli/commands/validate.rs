//! `validate` command: checks workout files without running them.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadResult};
use crate::error::{ConfigError, HiitError, Severity, ValidationIssue};

/// Outcome of validating one file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// File that was checked
    pub file: String,
    /// Whether the file passed
    pub valid: bool,
    /// Problems that prevent loading
    pub errors: Vec<String>,
    /// Informational findings
    pub warnings: Vec<String>,
}

/// Validate every file in `args.files`, reporting each one.
///
/// All files are checked even after a failure; the first failure is
/// returned.
///
/// # Errors
///
/// Returns the error of the first file that failed validation.
pub fn run(args: &ValidateArgs) -> Result<(), HiitError> {
    let loader = ConfigLoader::default();
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<HiitError> = None;

    for path in &args.files {
        info!(file = %path.display(), "validating workout");
        let (report, error) = check_file(&loader, path, args.strict);
        if let Some(e) = error {
            first_error.get_or_insert(e);
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                println!("{}", render_human(report));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    first_error.map_or(Ok(()), Err)
}

/// Validates one file. In strict mode warnings count as errors.
#[must_use]
pub fn check_file(
    loader: &ConfigLoader,
    path: &Path,
    strict: bool,
) -> (FileReport, Option<HiitError>) {
    let file = path.display().to_string();

    match loader.load(path) {
        Ok(LoadResult { warnings, .. }) => {
            for warning in &warnings {
                warn!(
                    file = %file,
                    location = warning.location.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    warning.message
                );
            }
            let messages: Vec<String> = warnings
                .iter()
                .map(|w| match &w.location {
                    Some(location) => format!("{} at {location}", w.message),
                    None => w.message.clone(),
                })
                .collect();

            if strict && !warnings.is_empty() {
                let issues = warnings
                    .into_iter()
                    .map(|w| ValidationIssue {
                        path: w.location.unwrap_or_default(),
                        message: w.message,
                        severity: Severity::Error,
                    })
                    .collect();
                let report = FileReport {
                    file: file.clone(),
                    valid: false,
                    errors: messages,
                    warnings: Vec::new(),
                };
                let error = ConfigError::ValidationError {
                    path: file,
                    errors: issues,
                };
                return (report, Some(error.into()));
            }

            let report = FileReport {
                file,
                valid: true,
                errors: Vec::new(),
                warnings: messages,
            };
            (report, None)
        }
        Err(e) => {
            let errors = match &e {
                ConfigError::ValidationError { errors, .. } => errors
                    .iter()
                    .map(|issue| format!("{} at {}", issue.message, issue.path))
                    .collect(),
                ConfigError::ParseError {
                    line: Some(line),
                    message,
                    ..
                } => vec![format!("line {line}: {message}")],
                other => vec![other.to_string()],
            };
            let report = FileReport {
                file,
                valid: false,
                errors,
                warnings: Vec::new(),
            };
            (report, Some(e.into()))
        }
    }
}

/// Human-readable report for one file.
#[must_use]
pub fn render_human(report: &FileReport) -> String {
    let mut lines = vec![format!(
        "{}: {}",
        report.file,
        if report.valid { "ok" } else { "invalid" }
    )];
    lines.extend(report.errors.iter().map(|e| format!("  error: {e}")));
    lines.extend(report.warnings.iter().map(|w| format!("  warning: {w}")));
    lines.join("\n")
}
