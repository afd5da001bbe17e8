mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use common::{Tick, is_off, is_on, ticks};
use proptest::prelude::*;
use tracephase::error::VerifyError;
use tracephase::phase::{Failure, FailureKind, FailureLocation, NO_ENTRIES, NamedPredicate, Verdict};
use tracephase::subject::TraceSubject;
use tracephase::trace::Trace;

fn failures(result: Result<(), VerifyError>) -> Vec<Failure> {
    match result {
        Ok(()) => Vec::new(),
        Err(VerifyError::Failed(report)) => report.failures,
        Err(VerifyError::Misuse(misuse)) => panic!("unexpected misuse: {misuse}"),
    }
}

fn counting(name: &str, calls: &Arc<AtomicUsize>) -> NamedPredicate<Tick> {
    let calls = Arc::clone(calls);
    NamedPredicate::new(name, move |_: &Tick| {
        calls.fetch_add(1, Ordering::SeqCst);
        Verdict::pass("counted")
    })
}

// ============================================================================
// Fixed scenarios
// ============================================================================

#[test]
fn empty_trace_reports_no_entries_without_calling_predicates() {
    let calls = Arc::new(AtomicUsize::new(0));
    let trace = ticks(&[]);

    for run in 0..4 {
        let subject = TraceSubject::assert_that(&trace).add(counting("p", &calls));
        let result = match run {
            0 => subject.for_all_entries(),
            1 => subject.for_range(0, 100),
            2 => subject.in_the_beginning(),
            _ => subject.at_the_end(),
        };
        let failures = failures(result);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].kind, FailureKind::NoEntries);
        assert_eq!(failures[0].reason, NO_ENTRIES);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn range_excluding_everything_reports_no_entries() {
    let trace = ticks(&[true, true, true]);
    let failures = failures(
        TraceSubject::assert_that(&trace)
            .add(is_on())
            .for_range(1000, 2000),
    );
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::NoEntries);
    assert_eq!(failures[0].location, FailureLocation::Trace);
}

#[test]
fn boundary_modes_call_each_predicate_once() {
    let signals = vec![true; 1000];
    let trace = ticks(&signals);

    let a = Arc::new(AtomicUsize::new(0));
    let b = Arc::new(AtomicUsize::new(0));
    TraceSubject::assert_that(&trace)
        .add(counting("a", &a))
        .then()
        .add(counting("b", &b))
        .in_the_beginning()
        .unwrap();
    assert_eq!(a.load(Ordering::SeqCst), 1);
    assert_eq!(b.load(Ordering::SeqCst), 1);

    let c = Arc::new(AtomicUsize::new(0));
    TraceSubject::assert_that(&trace)
        .add(counting("c", &c))
        .at_the_end()
        .unwrap();
    assert_eq!(c.load(Ordering::SeqCst), 1);
}

#[test]
fn only_first_entry_failing_affects_first_entry_mode_only() {
    let mut signals = vec![true; 1000];
    signals[0] = false;
    let trace = ticks(&signals);

    let first = failures(
        TraceSubject::assert_that(&trace)
            .add(is_on())
            .in_the_beginning(),
    );
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].timestamp(), Some(0));

    let last = failures(TraceSubject::assert_that(&trace).add(is_on()).at_the_end());
    assert!(last.is_empty());
}

#[test]
fn entry_matching_neither_phase_fails_on_second_phase() {
    let trace = ticks(&[false, false, true]);
    let failures = failures(
        TraceSubject::assert_that(&trace)
            .add(is_off())
            .then()
            .satisfies("never", |_: &Tick| Verdict::fail("rejected"))
            .for_all_entries(),
    );
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].phase, "never");
    assert_eq!(failures[0].timestamp(), Some(20));
    assert_eq!(failures[0].reason, "rejected");
}

#[test]
fn boundary_mode_reports_only_first_failing_predicate() {
    let trace = ticks(&[false, true]);
    let failures = failures(
        TraceSubject::assert_that(&trace)
            .add(is_on())
            .and()
            .add(is_on())
            .then()
            .add(is_on())
            .in_the_beginning(),
    );
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].phase, "on");
    assert_eq!(failures[0].timestamp(), Some(0));
}

#[test]
fn last_entry_sees_final_state() {
    let t = ticks(&[false, false, true]);
    TraceSubject::assert_that(&t)
        .add(is_on())
        .at_the_end()
        .unwrap();
    let failures = failures(TraceSubject::assert_that(&t).add(is_off()).at_the_end());
    assert_eq!(failures[0].timestamp(), Some(20));
}

#[test]
fn every_unreached_phase_is_reported() {
    let trace = ticks(&[false, false]);
    let failures = failures(
        TraceSubject::assert_that(&trace)
            .add(is_off())
            .then()
            .add(is_on())
            .then()
            .satisfies("never", |_: &Tick| Verdict::fail("never"))
            .for_all_entries(),
    );
    assert_eq!(failures.len(), 2);
    assert!(
        failures
            .iter()
            .all(|f| f.kind == FailureKind::PhaseMismatch)
    );
    assert_eq!(failures[0].phase, "on");
    assert_eq!(failures[1].phase, "never");
    assert!(failures[0].reason.contains("passed: off"));
}

#[test]
fn advance_then_fail_reports_entry_after_last_phase() {
    let trace = ticks(&[false, true, false]);
    let failures = failures(
        TraceSubject::assert_that(&trace)
            .add(is_off())
            .then()
            .add(is_on())
            .for_all_entries(),
    );
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].kind, FailureKind::PredicateFailure);
    assert_eq!(failures[0].phase, "on");
    assert_eq!(
        failures[0].location,
        FailureLocation::Entry {
            index: 2,
            timestamp: 20
        }
    );
    assert_eq!(failures[0].reason, "signal off");
}

#[test]
fn and_before_any_phase_is_misuse() {
    let trace = ticks(&[true]);
    let result = TraceSubject::assert_that(&trace)
        .and()
        .add(is_on())
        .for_all_entries();
    assert!(matches!(result, Err(VerifyError::Misuse(_))));
}

#[test]
fn inverted_range_is_misuse() {
    let trace = ticks(&[true]);
    let result = TraceSubject::assert_that(&trace)
        .add(is_on())
        .for_range(10, 0);
    assert!(matches!(result, Err(VerifyError::Misuse(_))));
}

#[test]
fn one_trace_serves_concurrent_verifications() {
    let trace = Arc::new(ticks(&[false, true, true]));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let trace = Arc::clone(&trace);
            std::thread::spawn(move || {
                TraceSubject::assert_that(&*trace)
                    .add(is_off())
                    .then()
                    .add(is_on())
                    .for_all_entries()
                    .is_ok()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A single always-true phase passes on any non-empty trace.
    #[test]
    fn single_true_phase_passes(signals in prop::collection::vec(any::<bool>(), 1..60)) {
        let trace = ticks(&signals);
        let result = TraceSubject::assert_that(&trace)
            .satisfies("always", |_: &Tick| Verdict::pass("ok"))
            .for_all_entries();
        prop_assert!(result.is_ok());
    }

    /// `off then on` passes exactly on traces shaped off+ on+.
    #[test]
    fn two_phase_split(offs in 0usize..20, ons in 0usize..20) {
        let mut signals = vec![false; offs];
        signals.extend(std::iter::repeat_n(true, ons));
        prop_assume!(!signals.is_empty());

        let trace = ticks(&signals);
        let result = TraceSubject::assert_that(&trace)
            .add(is_off())
            .then()
            .add(is_on())
            .for_all_entries();
        prop_assert_eq!(result.is_ok(), offs >= 1 && ons >= 1);
    }

    /// Checking a range equals checking the pre-filtered trace.
    #[test]
    fn range_filter_commutes(
        signals in prop::collection::vec(any::<bool>(), 0..40),
        start in -20i64..420,
        len in 0i64..200,
    ) {
        let end = start + len;
        let trace = ticks(&signals);
        let filtered = Trace::new(
            trace
                .entries()
                .iter()
                .copied()
                .filter(|t| (start..=end).contains(&t.timestamp))
                .collect(),
        )
        .unwrap();

        let ranged = failures(
            TraceSubject::assert_that(&trace)
                .add(is_off())
                .then()
                .add(is_on())
                .for_range(start, end),
        );
        let direct = failures(
            TraceSubject::assert_that(&filtered)
                .add(is_off())
                .then()
                .add(is_on())
                .for_all_entries(),
        );
        prop_assert_eq!(ranged, direct);
    }

    /// Skipping reports the same failures as checking the suffix that
    /// starts at the first match.
    #[test]
    fn skip_until_first_equals_suffix(signals in prop::collection::vec(any::<bool>(), 1..40)) {
        let trace = ticks(&signals);
        let skipped = failures(
            TraceSubject::assert_that(&trace)
                .add(is_on())
                .then()
                .add(is_off())
                .skip_until_first_assertion()
                .for_all_entries(),
        );

        match signals.iter().position(|&on| on) {
            None => {
                prop_assert_eq!(skipped.len(), 1);
                prop_assert_eq!(skipped[0].kind, FailureKind::PhaseMismatch);
                prop_assert_eq!(skipped[0].phase.as_str(), "on");
            }
            Some(first) => {
                let suffix = Trace::new(trace.entries()[first..].to_vec()).unwrap();
                let direct = failures(
                    TraceSubject::assert_that(&suffix)
                        .add(is_on())
                        .then()
                        .add(is_off())
                        .for_all_entries(),
                );
                let summary = |list: &[Failure]| {
                    list.iter()
                        .map(|f| (f.kind, f.phase.clone(), f.reason.clone(), f.timestamp()))
                        .collect::<Vec<_>>()
                };
                prop_assert_eq!(summary(&skipped), summary(&direct));
            }
        }
    }

    /// Boundary modes only ever look at one entry.
    #[test]
    fn boundary_modes_match_single_entry(signals in prop::collection::vec(any::<bool>(), 1..40)) {
        let trace = ticks(&signals);
        let first = TraceSubject::assert_that(&trace).add(is_on()).in_the_beginning();
        let last = TraceSubject::assert_that(&trace).add(is_on()).at_the_end();
        prop_assert_eq!(first.is_ok(), signals[0]);
        prop_assert_eq!(last.is_ok(), signals[signals.len() - 1]);
    }
}
