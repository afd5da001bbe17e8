//! Pass/fail verdicts produced by predicates.

use std::fmt;

/// Result of applying one predicate to one snapshot.
///
/// The reason describes the observed state and is meaningful whether the
/// verdict passed or failed, so negating a verdict keeps the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    passed: bool,
    reason: String,
}

impl Verdict {
    /// A passing verdict.
    #[must_use]
    pub fn pass(reason: impl Into<String>) -> Self {
        Self {
            passed: true,
            reason: reason.into(),
        }
    }

    /// A failing verdict.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: reason.into(),
        }
    }

    /// Whether the predicate held.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Whether the predicate was rejected.
    #[must_use]
    pub const fn failed(&self) -> bool {
        !self.passed
    }

    /// Human-readable explanation.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Flips pass/fail, keeping the reason.
    #[must_use]
    pub fn negate(self) -> Self {
        Self {
            passed: !self.passed,
            reason: self.reason,
        }
    }

    /// Logical AND. A failing `self` short-circuits and is returned as is;
    /// otherwise `next` decides.
    #[must_use]
    pub fn and_then(self, next: impl FnOnce() -> Self) -> Self {
        if self.passed { next() } else { self }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "passed" } else { "failed" };
        write!(f, "{status}: {}", self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negate_keeps_reason() {
        let v = Verdict::pass("W is visible").negate();
        assert!(v.failed());
        assert_eq!(v.reason(), "W is visible");
        assert!(v.negate().passed());
    }

    #[test]
    fn and_then_first_failure_wins() {
        let v = Verdict::fail("first").and_then(|| Verdict::fail("second"));
        assert_eq!(v.reason(), "first");
    }

    #[test]
    fn and_then_does_not_evaluate_after_failure() {
        let mut called = false;
        let _ = Verdict::fail("x").and_then(|| {
            called = true;
            Verdict::pass("y")
        });
        assert!(!called);
    }

    #[test]
    fn and_then_passes_through_to_next() {
        let v = Verdict::pass("first").and_then(|| Verdict::fail("second"));
        assert!(v.failed());
        assert_eq!(v.reason(), "second");
    }

    #[test]
    fn display() {
        assert_eq!(Verdict::fail("gone").to_string(), "failed: gone");
        assert_eq!(Verdict::pass("here").to_string(), "passed: here");
    }
}
