//! Named predicates and the phase groups built from them.

use std::fmt;

use tracing::trace;

use super::verdict::Verdict;

type Evaluate<E> = Box<dyn Fn(&E) -> Verdict + Send + Sync>;

/// A display name paired with a pure check over one snapshot.
pub struct NamedPredicate<E> {
    name: String,
    evaluate: Evaluate<E>,
}

impl<E> NamedPredicate<E> {
    /// Creates a predicate. `evaluate` must be deterministic and must not
    /// rely on shared mutable state.
    pub fn new(
        name: impl Into<String>,
        evaluate: impl Fn(&E) -> Verdict + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            evaluate: Box::new(evaluate),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Applies the predicate to a snapshot.
    pub fn evaluate(&self, entry: &E) -> Verdict {
        (self.evaluate)(entry)
    }
}

impl<E> fmt::Debug for NamedPredicate<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Conjunction of predicates describing one expected stage of the trace.
///
/// Never empty: a group is created with its first predicate.
pub struct PhaseGroup<E> {
    predicates: Vec<NamedPredicate<E>>,
}

impl<E> PhaseGroup<E> {
    /// Starts a group with one predicate.
    #[must_use]
    pub fn new(first: NamedPredicate<E>) -> Self {
        Self {
            predicates: vec![first],
        }
    }

    /// Adds a predicate to the conjunction.
    pub fn push(&mut self, predicate: NamedPredicate<E>) {
        self.predicates.push(predicate);
    }

    /// Member predicates in declaration order.
    #[must_use]
    pub fn predicates(&self) -> &[NamedPredicate<E>] {
        &self.predicates
    }

    /// Member names joined with `" and "`.
    #[must_use]
    pub fn name(&self) -> String {
        self.predicates
            .iter()
            .map(NamedPredicate::name)
            .collect::<Vec<_>>()
            .join(" and ")
    }

    /// First predicate that rejects `entry`, with its verdict.
    pub fn first_failure(&self, entry: &E) -> Option<(&NamedPredicate<E>, Verdict)> {
        self.predicates.iter().find_map(|predicate| {
            let verdict = predicate.evaluate(entry);
            trace!(
                predicate = predicate.name(),
                passed = verdict.passed(),
                "evaluated"
            );
            verdict.failed().then_some((predicate, verdict))
        })
    }

    /// Evaluates the whole conjunction. The first failing member decides
    /// the reason; a pass carries the joined group name.
    pub fn evaluate(&self, entry: &E) -> Verdict {
        self.first_failure(entry)
            .map_or_else(|| Verdict::pass(self.name()), |(_, verdict)| verdict)
    }
}

impl<E> fmt::Debug for PhaseGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseGroup")
            .field("name", &self.name())
            .finish()
    }
}
