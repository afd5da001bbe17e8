//! Verification façade
//!
//! [`TraceSubject`] wraps one borrowed [`Trace`] and one [`PhaseChecker`].
//! Predicates are declared fluently; `then()` starts a new phase for the
//! following predicates and `and()` folds them into the current one.
//! Exactly one terminal call (`for_all_entries`, `for_range`,
//! `in_the_beginning`, `at_the_end`) consumes the subject and runs the
//! engine.
//!
//! ```
//! use tracephase::phase::{NamedPredicate, Verdict};
//! use tracephase::subject::TraceSubject;
//! use tracephase::trace::{Snapshot, Trace};
//!
//! struct Light(i64, bool);
//! impl Snapshot for Light {
//!     fn timestamp(&self) -> i64 { self.0 }
//! }
//!
//! let on = || NamedPredicate::new("on", |l: &Light| {
//!     if l.1 { Verdict::pass("light on") } else { Verdict::fail("light off") }
//! });
//! let off = || NamedPredicate::new("off", |l: &Light| {
//!     if l.1 { Verdict::fail("light on") } else { Verdict::pass("light off") }
//! });
//!
//! let trace = Trace::new(vec![Light(0, false), Light(1, true)]).unwrap();
//! TraceSubject::assert_that(&trace)
//!     .add(off())
//!     .then()
//!     .add(on())
//!     .for_all_entries()
//!     .unwrap();
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::error::{BuilderMisuse, VerifyError};
use crate::phase::{Failure, NamedPredicate, PhaseChecker, TimestampRange, Verdict};
use crate::trace::{Snapshot, Trace};

/// How the next declared predicate joins the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chain {
    /// Start a new phase group
    #[default]
    NewPhase,
    /// Extend the current phase group
    ExtendPhase,
}

/// Fluent verification over one trace.
#[must_use = "a subject does nothing until a terminal evaluation is called"]
pub struct TraceSubject<'t, E> {
    trace: &'t Trace<E>,
    checker: PhaseChecker<E>,
    chain: Chain,
    misuse: Option<BuilderMisuse>,
}

impl<'t, E: Snapshot> TraceSubject<'t, E> {
    /// Starts a verification of `trace`.
    pub fn assert_that(trace: &'t Trace<E>) -> Self {
        Self {
            trace,
            checker: PhaseChecker::new(),
            chain: Chain::default(),
            misuse: None,
        }
    }

    /// Declares a predicate, joined according to the current [`Chain`].
    pub fn add(mut self, predicate: NamedPredicate<E>) -> Self {
        match self.chain {
            Chain::NewPhase => self.checker.add(predicate),
            Chain::ExtendPhase => {
                if let Err(misuse) = self.checker.append(predicate) {
                    self.misuse.get_or_insert(misuse);
                }
            }
        }
        self
    }

    /// Declares a predicate from a name and a closure.
    pub fn satisfies(
        self,
        name: impl Into<String>,
        evaluate: impl Fn(&E) -> Verdict + Send + Sync + 'static,
    ) -> Self {
        self.add(NamedPredicate::new(name, evaluate))
    }

    /// Following predicates start a new phase.
    pub fn then(mut self) -> Self {
        self.chain = Chain::NewPhase;
        self
    }

    /// Following predicates extend the current phase.
    pub fn and(mut self) -> Self {
        self.chain = Chain::ExtendPhase;
        self
    }

    /// Ignores leading entries until the first phase holds. If it never
    /// holds, the verification fails naming the first phase.
    pub fn skip_until_first_assertion(mut self) -> Self {
        self.checker.skip_until_first_assertion();
        self
    }

    /// Phases flagged as repeating the phase before them.
    #[must_use]
    pub fn advisories(&self) -> Vec<String> {
        self.checker.advisories()
    }

    /// Checks the phases against every entry.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Failed`] with every failure found, or
    /// [`VerifyError::Misuse`] if the subject was assembled incorrectly.
    pub fn for_all_entries(self) -> Result<(), VerifyError> {
        self.test()
    }

    /// Checks the phases against entries with `start <= timestamp <= end`.
    ///
    /// # Errors
    ///
    /// As [`for_all_entries`](Self::for_all_entries); an inverted range is
    /// a [`BuilderMisuse::InvertedRange`].
    pub fn for_range(mut self, start: i64, end: i64) -> Result<(), VerifyError> {
        let range = TimestampRange::new(start, end)?;
        self.checker.filter_by_range(range);
        self.test()
    }

    /// Checks every declared predicate against the first entry only.
    ///
    /// # Errors
    ///
    /// As [`for_all_entries`](Self::for_all_entries).
    pub fn in_the_beginning(mut self) -> Result<(), VerifyError> {
        self.checker.check_first_entry();
        self.test()
    }

    /// Checks every declared predicate against the last entry only.
    ///
    /// # Errors
    ///
    /// As [`for_all_entries`](Self::for_all_entries).
    pub fn at_the_end(mut self) -> Result<(), VerifyError> {
        self.checker.check_last_entry();
        self.test()
    }

    fn test(self) -> Result<(), VerifyError> {
        if let Some(misuse) = self.misuse {
            return Err(misuse.into());
        }

        let failures = self.checker.test(self.trace.entries());
        if failures.is_empty() {
            debug!(trace = %self.trace, mode = ?self.checker.mode(), "verification passed");
            return Ok(());
        }

        debug!(
            trace = %self.trace,
            failures = failures.len(),
            "verification failed"
        );
        Err(VerifyError::Failed(FailureReport::new(self.trace, failures)))
    }
}

impl<E> fmt::Debug for TraceSubject<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraceSubject")
            .field("checker", &self.checker)
            .field("chain", &self.chain)
            .field("misuse", &self.misuse)
            .finish_non_exhaustive()
    }
}

/// Aggregated failures of one verification, with trace identity.
#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    /// Failures in the order the engine found them
    pub failures: Vec<Failure>,
    /// Default description of the trace
    pub trace: String,
    /// Absolute path the trace was loaded from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Checksum of the trace file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

impl FailureReport {
    /// Builds a report for `failures` observed on `trace`.
    #[must_use]
    pub fn new<E: Snapshot>(trace: &Trace<E>, failures: Vec<Failure>) -> Self {
        let provenance = trace.provenance();
        Self {
            failures,
            trace: trace.to_string(),
            source: provenance.map(crate::trace::TraceProvenance::absolute_source),
            checksum: provenance.and_then(|p| p.checksum.clone()),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(
                f,
                "\nTrace can be found in: {}\nChecksum: {}\n",
                source.display(),
                self.checksum.as_deref().unwrap_or("<unknown>")
            )?;
        }
        let body = self
            .failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        f.write_str(&body)?;
        if self.source.is_none() {
            write!(f, "\ntrace: {}", self.trace)?;
        }
        Ok(())
    }
}
