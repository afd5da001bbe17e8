//! Phase matching
//!
//! Declared behavior is a sequence of phases, each a conjunction of named
//! predicates. The checker walks a trace and decides whether the phases
//! occur in order.
//!
//! # Architecture
//!
//! - [`Verdict`]: pass/fail with a reason, from one predicate on one snapshot
//! - [`NamedPredicate`] and [`PhaseGroup`]: predicates and their conjunctions
//! - [`PhaseChecker`]: the matching engine and its modes

pub mod checker;
pub mod group;
pub mod verdict;

pub use checker::{
    CheckMode, Failure, FailureKind, FailureLocation, NO_ENTRIES, PhaseChecker, TimestampRange,
};
pub use group::{NamedPredicate, PhaseGroup};
pub use verdict::Verdict;
