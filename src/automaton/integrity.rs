//! Whole-graph integrity check.
//!
//! Mutation through the [`Automaton`] API cannot break these invariants, but
//! a graph that arrives from outside (a deserialized checkpoint) can. The
//! check accumulates every violation instead of stopping at the first.

use super::error::IntegrityViolation;
use super::Automaton;
use crate::core::{State, StateId, Transition};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Result of an integrity check.
pub type Integrity = Validation<(), NonEmptyVec<IntegrityViolation>>;

/// Borrowed view of the parts that make up a graph.
pub(crate) struct Parts<'a> {
    pub start: StateId,
    pub states: &'a [State],
    pub transitions: &'a [Transition],
    pub next_state: u32,
    pub next_transition: u32,
}

impl Parts<'_> {
    pub(crate) fn check(&self) -> Integrity {
        let mut checks: Vec<Integrity> = Vec::new();

        let members: HashSet<StateId> = self.states.iter().map(|s| s.id).collect();

        // Start state must exist and lead the persisted order
        if !members.contains(&self.start) {
            checks.push(Validation::fail(IntegrityViolation::StartStateMissing(
                self.start,
            )));
        } else if self.states.first().map(|s| s.id) != Some(self.start) {
            checks.push(Validation::fail(IntegrityViolation::StartStateNotFirst(
                self.start,
            )));
        }

        let mut seen_states = HashSet::new();
        for state in self.states {
            if !seen_states.insert(state.id) {
                checks.push(Validation::fail(IntegrityViolation::DuplicateState(state.id)));
            }
            if state.id.0 >= self.next_state {
                checks.push(Validation::fail(IntegrityViolation::StaleHandleCounter(
                    state.id.to_string(),
                )));
            }
        }

        let mut seen_transitions = HashSet::new();
        for t in self.transitions {
            if !seen_transitions.insert(t.id) {
                checks.push(Validation::fail(IntegrityViolation::DuplicateTransition(t.id)));
            }
            if t.id.0 >= self.next_transition {
                checks.push(Validation::fail(IntegrityViolation::StaleHandleCounter(
                    t.id.to_string(),
                )));
            }
            for endpoint in [t.from, t.to] {
                if !members.contains(&endpoint) {
                    checks.push(Validation::fail(IntegrityViolation::DanglingEndpoint {
                        transition: t.id,
                        state: endpoint,
                    }));
                }
            }
        }

        if checks.is_empty() {
            return Validation::success(());
        }
        Validation::all_vec(checks).map(|_| ())
    }
}

impl Automaton {
    /// Verify every structural invariant, reporting all violations at once.
    ///
    /// # Example
    ///
    /// ```rust
    /// use nfakit::{Automaton, Position};
    ///
    /// let nfa = Automaton::new(Position::new(0, 0), false);
    /// assert!(nfa.check_integrity().is_success());
    /// ```
    pub fn check_integrity(&self) -> Integrity {
        Parts {
            start: self.start,
            states: &self.states,
            transitions: &self.transitions,
            next_state: self.next_state,
            next_transition: self.next_transition,
        }
        .check()
    }
}
