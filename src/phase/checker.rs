//! Phase checker
//!
//! Matches an ordered list of [`PhaseGroup`]s against an ordered list of
//! snapshots. In all-entries mode every group must hold over a contiguous,
//! non-empty run of snapshots, the runs partitioning the (filtered) trace
//! from left to right. Boundary modes check only the first or last
//! snapshot against every declared predicate.
//!
//! The checker is a single-use, single-threaded decision procedure: it
//! never mutates the snapshots and runs in one linear pass.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::BuilderMisuse;
use crate::trace::Snapshot;

use super::group::{NamedPredicate, PhaseGroup};

/// Reason text of the failure produced when there is nothing to check.
pub const NO_ENTRIES: &str = "No entries found.";

/// Which snapshots a terminal evaluation inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// Every snapshot, phase by phase
    #[default]
    AllEntries,
    /// Only the first snapshot, against all predicates at once
    FirstEntry,
    /// Only the last snapshot, against all predicates at once
    LastEntry,
}

/// Inclusive timestamp window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimestampRange {
    /// First timestamp included
    pub start: i64,
    /// Last timestamp included
    pub end: i64,
}

impl TimestampRange {
    /// Creates a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderMisuse::InvertedRange`] when the bounds are swapped.
    pub fn new(start: i64, end: i64) -> Result<Self, BuilderMisuse> {
        if start > end {
            return Err(BuilderMisuse::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether `timestamp` lies within the range.
    #[must_use]
    pub const fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Category of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No snapshots were available to check
    NoEntries,
    /// A phase was never reached or never matched
    PhaseMismatch,
    /// A predicate rejected a snapshot
    PredicateFailure,
}

/// Where in the evaluated sequence a failure was observed.
///
/// Indexes are positions in the sequence the checker evaluated, i.e. after
/// range filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum FailureLocation {
    /// A single snapshot
    Entry {
        /// Position in the evaluated sequence
        index: usize,
        /// Snapshot timestamp
        timestamp: i64,
    },
    /// A run of snapshots
    Span {
        /// Timestamp of the first snapshot
        start: i64,
        /// Timestamp of the last snapshot
        end: i64,
    },
    /// The trace as a whole
    Trace,
}

impl fmt::Display for FailureLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry { timestamp, .. } => f.write_str(&pretty_timestamp(*timestamp)),
            Self::Span { start, end } => write!(
                f,
                "{}..{}",
                pretty_timestamp(*start),
                pretty_timestamp(*end)
            ),
            Self::Trace => f.write_str("-"),
        }
    }
}

/// One localized failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Failure category
    pub kind: FailureKind,
    /// Name of the phase group (or predicate, for boundary checks)
    pub phase: String,
    /// Where the failure was observed
    pub location: FailureLocation,
    /// Explanation, propagated verbatim from the predicate when one failed
    pub reason: String,
}

impl Failure {
    fn no_entries() -> Self {
        Self {
            kind: FailureKind::NoEntries,
            phase: String::new(),
            location: FailureLocation::Trace,
            reason: NO_ENTRIES.to_string(),
        }
    }

    /// Timestamp of the snapshot this failure points at, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<i64> {
        match self.location {
            FailureLocation::Entry { timestamp, .. } => Some(timestamp),
            FailureLocation::Span { start, .. } => Some(start),
            FailureLocation::Trace => None,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == FailureKind::NoEntries {
            return f.write_str(&self.reason);
        }
        write!(
            f,
            "Timestamp: {}\nAssertion: {}\nReason:   {}",
            self.location, self.phase, self.reason
        )
    }
}

/// Formats a nanosecond timestamp as a human duration (`1s 20ms`).
#[must_use]
pub fn pretty_timestamp(timestamp: i64) -> String {
    u64::try_from(timestamp).map_or_else(
        |_| format!("{timestamp}ns"),
        |nanos| humantime::format_duration(Duration::from_nanos(nanos)).to_string(),
    )
}

/// The phase-matching engine.
///
/// Groups are declared with [`add`](Self::add) (start a new phase) and
/// [`append`](Self::append) (extend the current phase). The group under
/// construction is held open; starting a new phase seals it.
pub struct PhaseChecker<E> {
    sealed: Vec<PhaseGroup<E>>,
    open: Option<PhaseGroup<E>>,
    mode: CheckMode,
    range: Option<TimestampRange>,
    skip_until_first: bool,
}

impl<E> Default for PhaseChecker<E> {
    fn default() -> Self {
        Self {
            sealed: Vec::new(),
            open: None,
            mode: CheckMode::default(),
            range: None,
            skip_until_first: false,
        }
    }
}

impl<E> PhaseChecker<E> {
    /// Creates an empty checker in all-entries mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seals the open group and starts a new one with `predicate`.
    pub fn add(&mut self, predicate: NamedPredicate<E>) {
        if let Some(group) = self.open.take() {
            self.check_changing_assertions(&group);
            self.sealed.push(group);
        }
        self.open = Some(PhaseGroup::new(predicate));
    }

    /// Adds `predicate` to the open group.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderMisuse::ExtendWithoutPhase`] if no group exists yet.
    pub fn append(&mut self, predicate: NamedPredicate<E>) -> Result<(), BuilderMisuse> {
        match self.open.as_mut() {
            Some(group) => {
                group.push(predicate);
                Ok(())
            }
            None => Err(BuilderMisuse::ExtendWithoutPhase {
                predicate: predicate.name().to_string(),
            }),
        }
    }

    /// Logs `group` if it repeats the last sealed group. Advisory only: the
    /// duplicate is kept.
    fn check_changing_assertions(&self, group: &PhaseGroup<E>) {
        let Some(previous) = self.sealed.last() else {
            return;
        };
        let name = group.name();
        if previous.name() == name {
            warn!(phase = %name, "phase repeats the phase before it");
        }
    }

    /// Discard leading snapshots until the first group matches.
    pub fn skip_until_first_assertion(&mut self) {
        self.skip_until_first = true;
    }

    /// Restricts evaluation to snapshots within `range`.
    pub fn filter_by_range(&mut self, range: TimestampRange) {
        self.range = Some(range);
    }

    /// Only the first snapshot is checked.
    pub fn check_first_entry(&mut self) {
        self.mode = CheckMode::FirstEntry;
    }

    /// Only the last snapshot is checked.
    pub fn check_last_entry(&mut self) {
        self.mode = CheckMode::LastEntry;
    }

    /// Current evaluation mode.
    #[must_use]
    pub const fn mode(&self) -> CheckMode {
        self.mode
    }

    /// Declared groups in order, including the open one.
    pub fn groups(&self) -> impl Iterator<Item = &PhaseGroup<E>> {
        self.sealed.iter().chain(self.open.as_ref())
    }

    /// Names of groups identical to the group declared just before them.
    ///
    /// Only complete groups are compared, so a group still being extended
    /// by [`append`](Self::append) is judged on its current members.
    #[must_use]
    pub fn advisories(&self) -> Vec<String> {
        let names: Vec<String> = self.groups().map(PhaseGroup::name).collect();
        names
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[1].clone())
            .collect()
    }
}

impl<E: Snapshot> PhaseChecker<E> {
    /// Evaluates the declared groups against `entries`.
    ///
    /// Returns every failure found; an empty list means the trace matched.
    pub fn test(&self, entries: &[E]) -> Vec<Failure> {
        let filtered: Vec<&E> = match self.range {
            Some(range) => entries
                .iter()
                .filter(|e| range.contains(e.timestamp()))
                .collect(),
            None => entries.iter().collect(),
        };

        if filtered.is_empty() {
            debug!(
                total = entries.len(),
                range = ?self.range,
                "no entries to check"
            );
            return vec![Failure::no_entries()];
        }

        if let Some(open) = &self.open {
            self.check_changing_assertions(open);
        }

        let groups: Vec<&PhaseGroup<E>> = self.groups().collect();
        if groups.is_empty() {
            warn!("no phases declared; nothing to verify");
            return Vec::new();
        }

        debug!(
            mode = ?self.mode,
            entries = filtered.len(),
            phases = groups.len(),
            skip_until_first = self.skip_until_first,
            "checking trace"
        );

        let failures = match self.mode {
            CheckMode::FirstEntry => check_boundary(&groups, 0, filtered[0]),
            CheckMode::LastEntry => {
                let index = filtered.len() - 1;
                check_boundary(&groups, index, filtered[index])
            }
            CheckMode::AllEntries => self.check_all(&groups, &filtered),
        };

        debug!(failures = failures.len(), "check complete");
        failures
    }

    fn check_all(&self, groups: &[&PhaseGroup<E>], entries: &[&E]) -> Vec<Failure> {
        let mut begin = 0;
        let mut entry_index = 0;
        let mut group_index = 0;
        let mut last_matched: Option<usize> = None;

        if self.skip_until_first {
            let first = groups[0];
            let Some(start) = entries.iter().position(|e| first.evaluate(e).passed()) else {
                return vec![Failure {
                    kind: FailureKind::PhaseMismatch,
                    phase: first.name(),
                    location: FailureLocation::Span {
                        start: entries[0].timestamp(),
                        end: entries[entries.len() - 1].timestamp(),
                    },
                    reason: format!("no entry satisfies {}", first.name()),
                }];
            };
            debug!(skipped = start, "skipped leading entries");
            begin = start;
            entry_index = start + 1;
            last_matched = Some(0);
        }

        while entry_index < entries.len() {
            let entry = entries[entry_index];
            let verdict = groups[group_index].evaluate(entry);
            if verdict.passed() {
                last_matched = Some(group_index);
                entry_index += 1;
                continue;
            }

            let location = FailureLocation::Entry {
                index: entry_index,
                timestamp: entry.timestamp(),
            };

            // A group that never matched cannot hand over to the next one.
            if last_matched != Some(group_index) {
                return vec![Failure {
                    kind: FailureKind::PredicateFailure,
                    phase: groups[group_index].name(),
                    location,
                    reason: verdict.reason().to_string(),
                }];
            }

            if group_index + 1 == groups.len() {
                return vec![Failure {
                    kind: FailureKind::PredicateFailure,
                    phase: groups[group_index].name(),
                    location,
                    reason: verdict.reason().to_string(),
                }];
            }

            debug!(
                from = group_index,
                to = group_index + 1,
                timestamp = entry.timestamp(),
                "phase boundary"
            );
            group_index += 1;
        }

        let passed = groups[..=group_index]
            .iter()
            .map(|g| g.name())
            .collect::<Vec<_>>()
            .join(", ");
        let span = FailureLocation::Span {
            start: entries[begin].timestamp(),
            end: entries[entries.len() - 1].timestamp(),
        };

        groups[group_index + 1..]
            .iter()
            .map(|group| Failure {
                kind: FailureKind::PhaseMismatch,
                phase: group.name(),
                location: span,
                reason: format!("trace ended before this phase was reached (passed: {passed})"),
            })
            .collect()
    }
}

fn check_boundary<E>(groups: &[&PhaseGroup<E>], index: usize, entry: &E) -> Vec<Failure>
where
    E: Snapshot,
{
    groups
        .iter()
        .find_map(|group| group.first_failure(entry))
        .map(|(predicate, verdict)| Failure {
            kind: FailureKind::PredicateFailure,
            phase: predicate.name().to_string(),
            location: FailureLocation::Entry {
                index,
                timestamp: entry.timestamp(),
            },
            reason: verdict.reason().to_string(),
        })
        .into_iter()
        .collect()
}

impl<E> fmt::Debug for PhaseChecker<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseChecker")
            .field("groups", &self.groups().collect::<Vec<_>>())
            .field("mode", &self.mode)
            .field("range", &self.range)
            .field("skip_until_first", &self.skip_until_first)
            .finish_non_exhaustive()
    }
}
