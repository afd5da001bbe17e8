//! Plan loader
//!
//! Pipeline:
//! 1. Size check against [`Limits::max_plan_size`]
//! 2. YAML parsing into [`PlanFile`]
//! 3. Validation (all issues collected)
//! 4. Resolution into an executable [`Plan`]

use std::path::Path;

use serde::Serialize;

use crate::config::Limits;
use crate::error::PlanError;

use super::Plan;
use super::schema::PlanFile;
use super::validation::Validator;

/// Result of loading a plan.
#[derive(Debug)]
pub struct LoadResult {
    /// The validated plan.
    pub plan: Plan,

    /// Warnings encountered during validation.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during plan loading.
#[derive(Debug, Clone, Serialize)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} at {location}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Loads assertion plans from YAML.
#[derive(Debug, Clone, Default)]
pub struct PlanLoader {
    limits: Limits,
}

impl PlanLoader {
    /// Creates a loader with the given limits.
    #[must_use]
    pub const fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Loads and validates the plan at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or too large, if YAML
    /// parsing fails, or if validation reports errors.
    pub fn load(&self, path: &Path) -> Result<LoadResult, PlanError> {
        let metadata = std::fs::metadata(path).map_err(|_| PlanError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > self.limits.max_plan_size {
            return Err(PlanError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.limits.max_plan_size,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|_| PlanError::MissingFile {
            path: path.to_path_buf(),
        })?;

        self.load_str(&raw, path)
    }

    /// Parses and validates plan text. `path` is only used in messages.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::ParseError`] on malformed YAML and
    /// [`PlanError::ValidationError`] when validation reports errors.
    pub fn load_str(&self, raw: &str, path: &Path) -> Result<LoadResult, PlanError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        if raw.trim().is_empty() {
            return Err(PlanError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "plan file is empty".to_string(),
            });
        }

        let file: PlanFile = serde_yaml::from_str(raw).map_err(|e| PlanError::ParseError {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            message: e.to_string(),
        })?;

        let result = Validator::new().validate(&file, &self.limits);
        if result.has_errors() {
            return Err(PlanError::ValidationError {
                path: path.display().to_string(),
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
            plan: Plan::resolve(file)?,
            warnings,
        })
    }
}
