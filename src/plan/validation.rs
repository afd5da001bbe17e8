//! Plan validation
//!
//! Runs after parsing, on the deserialized [`PlanFile`]. Collects every
//! issue rather than stopping at the first so a plan can be fixed in one
//! pass.

use crate::config::Limits;
use crate::error::{Severity, ValidationIssue};
use crate::wm::WindowAssertion;

use super::schema::{PlanFile, PlanMode};

/// Result of validating a plan.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Issues that prevent the plan from being used.
    pub errors: Vec<ValidationIssue>,

    /// Informational issues.
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

/// Plan validator.
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

    /// Validates `plan` against `limits`.
    pub fn validate(&mut self, plan: &PlanFile, limits: &Limits) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_mode(plan);
        self.validate_phases(plan, limits);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn validate_mode(&mut self, plan: &PlanFile) {
        match (plan.mode, plan.range) {
            (PlanMode::Range, None) => {
                self.add_error("range", "mode 'range' requires a range");
            }
            (PlanMode::Range, Some(range)) if range.start > range.end => {
                self.add_error(
                    "range",
                    &format!("start {} is after end {}", range.start, range.end),
                );
            }
            (PlanMode::All | PlanMode::First | PlanMode::Last, Some(_)) => {
                self.add_warning("range", "range is ignored unless mode is 'range'");
            }
            _ => {}
        }

        if plan.skip_until_first && matches!(plan.mode, PlanMode::First | PlanMode::Last) {
            self.add_warning(
                "skip_until_first",
                "skip_until_first has no effect when checking a single entry",
            );
        }
    }

    fn validate_phases(&mut self, plan: &PlanFile, limits: &Limits) {
        if plan.phases.is_empty() {
            self.add_error("phases", "plan declares no phases");
            return;
        }

        if plan.phases.len() > limits.max_phases {
            self.add_error(
                "phases",
                &format!(
                    "plan declares {} phases (limit: {})",
                    plan.phases.len(),
                    limits.max_phases
                ),
            );
        }

        for (i, phase) in plan.phases.iter().enumerate() {
            if phase.is_empty() {
                self.add_error(&format!("phases[{i}]"), "phase is empty");
                continue;
            }

            for (j, entry) in phase.iter().enumerate() {
                let path = format!("phases[{i}][{j}]");
                if entry.len() != 1 {
                    self.add_error(&path, "expected exactly one '<assertion>: <window>' pair");
                    continue;
                }
                let Some((name, window)) = entry.first() else {
                    continue;
                };
                if let Err(e) = name.parse::<WindowAssertion>() {
                    self.add_error(&path, &e.to_string());
                }
                if window.trim().is_empty() {
                    self.add_error(&path, "window title is empty");
                }
            }

            if i > 0 && plan.phases[i - 1] == *phase {
                self.add_warning(
                    &format!("phases[{i}]"),
                    "phase repeats the phase before it and can never be reached",
                );
            }
        }
    }

    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}
