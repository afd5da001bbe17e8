//! Error types for `tracephase`
//!
//! Errors are split by where they originate: loading a trace, loading an
//! assertion plan, and running a verification. Everything funnels into
//! [`TracePhaseError`] at the CLI boundary, which maps to an exit code.

use std::path::PathBuf;
use thiserror::Error;

use crate::subject::FailureReport;

// ============================================================================
// Exit Codes
// ============================================================================

/// Exit codes for `tracephase` CLI operations.
pub struct ExitCode;

impl ExitCode {
    /// All assertions passed
    pub const SUCCESS: i32 = 0;

    /// The trace did not satisfy the plan
    pub const VERIFICATION_FAILED: i32 = 1;

    /// Plan error (invalid YAML, validation failure)
    pub const CONFIG_ERROR: i32 = 2;

    /// I/O error (file not found, permission denied)
    pub const IO_ERROR: i32 = 3;

    /// Trace could not be parsed or failed its checksum
    pub const TRACE_ERROR: i32 = 4;

    /// Usage error (invalid arguments, missing required options)
    pub const USAGE_ERROR: i32 = 64;
}

// ============================================================================
// Top-Level Error
// ============================================================================

/// Top-level error type for `tracephase` operations.
#[derive(Debug, Error)]
pub enum TracePhaseError {
    /// Trace loading error
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Assertion plan loading or validation error
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Verification did not pass
    #[error(transparent)]
    Verify(#[from] VerifyError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TracePhaseError {
    /// Returns the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Trace(TraceError::Io { .. })
            | Self::Plan(PlanError::MissingFile { .. })
            | Self::Io(_) => ExitCode::IO_ERROR,
            Self::Trace(_) => ExitCode::TRACE_ERROR,
            Self::Plan(_) | Self::Json(_) => ExitCode::CONFIG_ERROR,
            Self::Verify(VerifyError::Failed(_)) => ExitCode::VERIFICATION_FAILED,
            Self::Verify(VerifyError::Misuse(_)) => ExitCode::USAGE_ERROR,
        }
    }
}

// ============================================================================
// Trace Errors
// ============================================================================

/// Errors raised while building or loading a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Entries are not sorted by timestamp
    #[error(
        "entry {index} has timestamp {timestamp}, earlier than the previous entry ({previous})"
    )]
    Unordered {
        /// Index of the offending entry
        index: usize,
        /// Timestamp of the entry before it
        previous: i64,
        /// Timestamp of the offending entry
        timestamp: i64,
    },

    /// Trace file could not be decoded
    #[error("parse error in {path}: {message}")]
    Parse {
        /// Trace file path, or `<memory>` for in-memory input
        path: String,
        /// Decoder message
        message: String,
    },

    /// Claimed checksum does not match the file contents
    #[error("checksum mismatch for {path}: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        /// Trace file path
        path: PathBuf,
        /// Checksum supplied by the caller
        expected: String,
        /// Checksum computed from the file
        actual: String,
    },

    /// Trace file exceeds the configured size limit
    #[error("trace file {path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Trace file path
        path: PathBuf,
        /// Actual size in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// I/O error while reading the trace
    #[error("failed to read trace {path}: {source}")]
    Io {
        /// Trace file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Plan Errors
// ============================================================================

/// Assertion plan loading and validation errors.
#[derive(Debug, Error)]
pub enum PlanError {
    /// YAML parsing failed
    #[error("parse error in {path}: {message}")]
    ParseError {
        /// Path to the plan file
        path: PathBuf,
        /// Line number where the error occurred (if available)
        line: Option<usize>,
        /// Error message from the parser
        message: String,
    },

    /// Plan validation failed
    #[error("validation failed for {path}")]
    ValidationError {
        /// Path to the plan file
        path: String,
        /// Issues found, errors first
        errors: Vec<ValidationIssue>,
    },

    /// Plan file not found
    #[error("file not found: {path}")]
    MissingFile {
        /// Path to the missing file
        path: PathBuf,
    },

    /// Plan file exceeds the configured size limit
    #[error("plan file {path} is {size} bytes (limit: {limit})")]
    TooLarge {
        /// Path to the plan file
        path: PathBuf,
        /// Actual size in bytes
        size: usize,
        /// Configured limit in bytes
        limit: usize,
    },

    /// Unknown assertion name
    #[error("unknown assertion '{name}'{}", did_you_mean(suggestion.as_deref()))]
    UnknownAssertion {
        /// Name as written in the plan
        name: String,
        /// Closest known assertion, if any
        suggestion: Option<String>,
    },
}

fn did_you_mean(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(" (did you mean '{s}'?)"))
}

// ============================================================================
// Validation Types
// ============================================================================

/// A single validation issue found in an assertion plan.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ValidationIssue {
    /// Location in the plan (e.g., "phases[2][0]")
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
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Prevents the plan from being used
    Error,
    /// Reported but does not prevent loading
    Warning,
}

// ============================================================================
// Verification Errors
// ============================================================================

/// Programmer errors in how a verification was assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderMisuse {
    /// `and()` chained a predicate before any phase was started
    #[error("cannot extend phase '{predicate}': no phase has been started")]
    ExtendWithoutPhase {
        /// Predicate that could not be attached
        predicate: String,
    },

    /// `for_range` called with `start > end`
    #[error("invalid range: start {start} is after end {end}")]
    InvertedRange {
        /// Range start
        start: i64,
        /// Range end
        end: i64,
    },
}

/// Outcome of a terminal evaluation that did not pass.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The verification was assembled incorrectly
    #[error("builder misuse: {0}")]
    Misuse(#[from] BuilderMisuse),

    /// The trace did not satisfy the declared phases
    #[error("{0}")]
    Failed(FailureReport),
}

impl VerifyError {
    /// Returns the failure report, if this is a reported failure.
    #[must_use]
    pub const fn report(&self) -> Option<&FailureReport> {
        match self {
            Self::Failed(report) => Some(report),
            Self::Misuse(_) => None,
        }
    }
}

// ============================================================================
// Result Type Alias
// ============================================================================

/// Result type alias for `tracephase` operations.
pub type Result<T> = std::result::Result<T, TracePhaseError>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(ExitCode::SUCCESS, 0);
        assert_eq!(ExitCode::VERIFICATION_FAILED, 1);
        assert_eq!(ExitCode::CONFIG_ERROR, 2);
        assert_eq!(ExitCode::IO_ERROR, 3);
        assert_eq!(ExitCode::TRACE_ERROR, 4);
        assert_eq!(ExitCode::USAGE_ERROR, 64);
    }

    #[test]
    fn test_trace_error_exit_code() {
        let err: TracePhaseError = TraceError::Unordered {
            index: 3,
            previous: 10,
            timestamp: 5,
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::TRACE_ERROR);
    }

    #[test]
    fn test_plan_error_exit_code() {
        let err: TracePhaseError = PlanError::ParseError {
            path: PathBuf::from("/plan.yaml"),
            line: Some(3),
            message: "bad indent".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), ExitCode::CONFIG_ERROR);
    }

    #[test]
    fn test_missing_files_are_io_errors() {
        let plan: TracePhaseError = PlanError::MissingFile {
            path: PathBuf::from("/plan.yaml"),
        }
        .into();
        assert_eq!(plan.exit_code(), ExitCode::IO_ERROR);

        let trace: TracePhaseError = TraceError::Io {
            path: PathBuf::from("/trace.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
        .into();
        assert_eq!(trace.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_misuse_exit_code() {
        let misuse = BuilderMisuse::InvertedRange { start: 5, end: 1 };
        let err: TracePhaseError = VerifyError::from(misuse).into();
        assert_eq!(err.exit_code(), ExitCode::USAGE_ERROR);
    }

    #[test]
    fn test_io_error_exit_code() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let err: TracePhaseError = io_err.into();
        assert_eq!(err.exit_code(), ExitCode::IO_ERROR);
    }

    #[test]
    fn test_unordered_display() {
        let err = TraceError::Unordered {
            index: 2,
            previous: 20,
            timestamp: 10,
        };
        assert_eq!(
            err.to_string(),
            "entry 2 has timestamp 10, earlier than the previous entry (20)"
        );
    }

    #[test]
    fn test_unknown_assertion_display_with_suggestion() {
        let err = PlanError::UnknownAssertion {
            name: "shows_app_windw".to_string(),
            suggestion: Some("shows_app_window".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "unknown assertion 'shows_app_windw' (did you mean 'shows_app_window'?)"
        );
    }

    #[test]
    fn test_unknown_assertion_display_without_suggestion() {
        let err = PlanError::UnknownAssertion {
            name: "zzz".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown assertion 'zzz'");
    }

    #[test]
    fn test_validation_issue_display() {
        let issue = ValidationIssue {
            path: "phases[0]".to_string(),
            message: "phase is empty".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(issue.to_string(), "error: phase is empty at phases[0]");
    }

    #[test]
    fn test_validation_issue_warning_display() {
        let issue = ValidationIssue {
            path: "range".to_string(),
            message: "range is ignored".to_string(),
            severity: Severity::Warning,
        };
        assert_eq!(issue.to_string(), "warning: range is ignored at range");
    }

    #[test]
    fn test_builder_misuse_display() {
        let err = BuilderMisuse::ExtendWithoutPhase {
            predicate: "shows_app_window(Camera)".to_string(),
        };
        assert!(err.to_string().contains("shows_app_window(Camera)"));
    }
}
