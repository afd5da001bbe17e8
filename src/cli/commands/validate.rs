//! Plan validation command
//!
//! Every file is checked even after one fails, so a single run reports
//! all broken plans. The first failure becomes the command's error.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::Limits;
use crate::error::{PlanError, Severity, TracePhaseError, ValidationIssue};
use crate::plan::{LoadWarning, PlanLoader};

#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    issues: Vec<ValidationIssue>,
    warnings: Vec<LoadWarning>,
}

/// Validate one or more plan files without running them.
///
/// # Errors
///
/// Returns the first plan error encountered; with `--strict`, warnings
/// are reported as [`PlanError::ValidationError`].
pub fn run(args: &ValidateArgs) -> Result<(), TracePhaseError> {
    let loader = PlanLoader::new(Limits::default());
    let mut reports = Vec::with_capacity(args.files.len());
    let mut first_error: Option<PlanError> = None;

    for path in &args.files {
        info!(file = %path.display(), "validating plan");
        let (report, error) = validate_file(&loader, path, args.strict);
        if let Some(error) = error {
            first_error.get_or_insert(error);
        }
        reports.push(report);
    }

    match args.format {
        OutputFormat::Human => {
            for report in &reports {
                print_human(report);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    first_error.map_or(Ok(()), |e| Err(e.into()))
}

fn validate_file(
    loader: &PlanLoader,
    path: &Path,
    strict: bool,
) -> (FileReport, Option<PlanError>) {
    let mut report = FileReport {
        file: path.to_path_buf(),
        valid: false,
        error: None,
        issues: Vec::new(),
        warnings: Vec::new(),
    };

    match loader.load(path) {
        Ok(loaded) => {
            for warning in &loaded.warnings {
                warn!(
                    file = %path.display(),
                    location = warning.location.as_deref().unwrap_or("<unknown>"),
                    "{}",
                    warning.message
                );
            }
            report.warnings = loaded.warnings;

            if strict && !report.warnings.is_empty() {
                let errors: Vec<ValidationIssue> = report
                    .warnings
                    .iter()
                    .map(|w| ValidationIssue {
                        path: w.location.clone().unwrap_or_default(),
                        message: w.message.clone(),
                        severity: Severity::Error,
                    })
                    .collect();
                report.issues.clone_from(&errors);
                return (
                    report,
                    Some(PlanError::ValidationError {
                        path: path.display().to_string(),
                        errors,
                    }),
                );
            }

            report.valid = true;
            (report, None)
        }
        Err(PlanError::ValidationError { path: label, errors }) => {
            report.issues.clone_from(&errors);
            (
                report,
                Some(PlanError::ValidationError {
                    path: label,
                    errors,
                }),
            )
        }
        Err(e) => {
            report.error = Some(e.to_string());
            (report, Some(e))
        }
    }
}

fn print_human(report: &FileReport) {
    let status = if report.valid { "ok" } else { "FAILED" };
    println!("{}: {status}", report.file.display());
    if let Some(error) = &report.error {
        println!("  {error}");
    }
    for issue in &report.issues {
        println!("  {issue}");
    }
    if report.issues.is_empty() {
        for warning in &report.warnings {
            println!("  warning: {warning}");
        }
    }
}
