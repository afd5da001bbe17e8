//! Assertion plans
//!
//! A plan is a YAML description of a verification: which phases to expect
//! and how to evaluate them. Loading goes through [`PlanLoader`]; the
//! resulting [`Plan`] drives a [`TraceSubject`] over a window-manager trace.

pub mod loader;
pub mod schema;
pub mod validation;

use serde::Serialize;
use tracing::debug;

use crate::error::{PlanError, VerifyError};
use crate::phase::TimestampRange;
use crate::subject::TraceSubject;
use crate::trace::Trace;
use crate::wm::{WindowAssertion, WindowManagerEntry};

pub use loader::{LoadResult, LoadWarning, PlanLoader};
pub use schema::{PlanFile, PlanMode, RangeSpec};
pub use validation::{ValidationResult, Validator};

/// One resolved assertion: which check, on which window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanAssertion {
    /// Predicate from the library
    pub assertion: WindowAssertion,
    /// Partial window title
    pub window: String,
}

/// How a plan is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Every entry
    AllEntries,
    /// Entries within a timestamp range
    Range(TimestampRange),
    /// First entry only
    FirstEntry,
    /// Last entry only
    LastEntry,
}

/// A validated, executable plan.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    name: Option<String>,
    evaluation: Evaluation,
    skip_until_first: bool,
    phases: Vec<Vec<PlanAssertion>>,
}

impl Plan {
    /// Resolves a validated plan file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownAssertion`] for an unknown name and
    /// [`PlanError::ValidationError`] for a missing or inverted range.
    /// Both are caught earlier by the [`Validator`].
    pub fn resolve(file: PlanFile) -> Result<Self, PlanError> {
        let evaluation = match file.mode {
            PlanMode::All => Evaluation::AllEntries,
            PlanMode::First => Evaluation::FirstEntry,
            PlanMode::Last => Evaluation::LastEntry,
            PlanMode::Range => {
                let range = file
                    .range
                    .and_then(|r| TimestampRange::new(r.start, r.end).ok())
                    .ok_or_else(|| PlanError::ValidationError {
                        path: "range".to_string(),
                        errors: Vec::new(),
                    })?;
                Evaluation::Range(range)
            }
        };

        let phases = file
            .phases
            .into_iter()
            .map(|phase| {
                phase
                    .into_iter()
                    .flat_map(IntoIterator::into_iter)
                    .map(|(name, window)| {
                        Ok(PlanAssertion {
                            assertion: name.parse()?,
                            window,
                        })
                    })
                    .collect::<Result<Vec<_>, PlanError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: file.name,
            evaluation,
            skip_until_first: file.skip_until_first,
            phases,
        })
    }

    /// Plan name, if given.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Evaluation mode.
    #[must_use]
    pub const fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    /// Resolved phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Vec<PlanAssertion>] {
        &self.phases
    }

    /// Builds a subject over `trace` from this plan.
    pub fn subject<'t>(
        &self,
        trace: &'t Trace<WindowManagerEntry>,
    ) -> TraceSubject<'t, WindowManagerEntry> {
        let mut subject = TraceSubject::assert_that(trace);
        for (i, phase) in self.phases.iter().enumerate() {
            if i > 0 {
                subject = subject.then();
            }
            for (j, step) in phase.iter().enumerate() {
                if j == 1 {
                    subject = subject.and();
                }
                subject = subject.add(step.assertion.predicate(&step.window));
            }
        }
        if self.skip_until_first {
            subject = subject.skip_until_first_assertion();
        }
        subject
    }

    /// Runs the plan against `trace`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Failed`] when the trace does not satisfy the plan.
    pub fn apply(&self, trace: &Trace<WindowManagerEntry>) -> Result<(), VerifyError> {
        debug!(
            plan = self.name.as_deref().unwrap_or("<unnamed>"),
            evaluation = ?self.evaluation,
            phases = self.phases.len(),
            "applying plan"
        );
        let subject = self.subject(trace);
        match self.evaluation {
            Evaluation::AllEntries => subject.for_all_entries(),
            Evaluation::Range(range) => subject.for_range(range.start, range.end),
            Evaluation::FirstEntry => subject.in_the_beginning(),
            Evaluation::LastEntry => subject.at_the_end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wm::{WindowKind, WindowState};
    use std::path::Path;

    fn load(yaml: &str) -> Plan {
        PlanLoader::default()
            .load_str(yaml, Path::new("plan.yaml"))
            .unwrap()
            .plan
    }

    fn camera_trace() -> Trace<WindowManagerEntry> {
        let camera = |visible| vec![WindowState::new("Camera", WindowKind::App, visible)];
        Trace::new(vec![
            WindowManagerEntry::new(0, camera(false)),
            WindowManagerEntry::new(10, camera(false)),
            WindowManagerEntry::new(20, camera(true)),
            WindowManagerEntry::new(30, camera(true)),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_phases() {
        let plan = load(
            "name: p\nphases:\n  - - hides_app_window: Camera\n    - hides_ime_window: Ime\n",
        );
        assert_eq!(plan.name(), Some("p"));
        assert_eq!(plan.evaluation(), Evaluation::AllEntries);
        assert_eq!(
            plan.phases()[0],
            vec![
                PlanAssertion {
                    assertion: WindowAssertion::HidesAppWindow,
                    window: "Camera".to_string()
                },
                PlanAssertion {
                    assertion: WindowAssertion::HidesImeWindow,
                    window: "Ime".to_string()
                },
            ]
        );
    }

    #[test]
    fn resolve_rejects_unknown_name() {
        let file: PlanFile = serde_yaml::from_str("phases:\n  - - bogus: W\n").unwrap();
        let result = Plan::resolve(file);
        assert!(matches!(result, Err(PlanError::UnknownAssertion { .. })));
    }

    #[test]
    fn apply_all_entries_passes() {
        let plan = load(
            "phases:\n  - - hides_app_window: Camera\n  - - shows_app_window_on_top: Camera\n",
        );
        plan.apply(&camera_trace()).unwrap();
    }

    #[test]
    fn apply_range() {
        let plan = load(
            "mode: range\nrange: { start: 20, end: 30 }\nphases:\n  - - shows_app_window: Camera\n",
        );
        plan.apply(&camera_trace()).unwrap();
    }

    #[test]
    fn apply_boundaries() {
        load("mode: first\nphases:\n  - - hides_app_window: Camera\n")
            .apply(&camera_trace())
            .unwrap();
        load("mode: last\nphases:\n  - - shows_app_window: Camera\n")
            .apply(&camera_trace())
            .unwrap();
    }

    #[test]
    fn apply_skip_until_first() {
        let plan = load("skip_until_first: true\nphases:\n  - - shows_app_window: Camera\n");
        plan.apply(&camera_trace()).unwrap();
    }

    #[test]
    fn apply_reports_failure() {
        let plan = load("phases:\n  - - shows_app_window: Camera\n");
        let err = plan.apply(&camera_trace()).unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.failures[0].phase, "shows_app_window(Camera)");
        assert_eq!(report.failures[0].timestamp(), Some(0));
    }
}
