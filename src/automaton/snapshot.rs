//! Handle-preserving serde image of an automaton.
//!
//! [`Automaton`] itself is not deserializable: the only way back from bytes
//! is [`GraphSnapshot::restore`], which validates the parts before any
//! automaton exists.

use super::error::IntegrityViolation;
use super::integrity::Parts;
use super::Automaton;
use crate::core::{State, StateId, Transition};
use serde::{Deserialize, Serialize};
use stillwater::NonEmptyVec;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct GraphSnapshot {
    start: StateId,
    states: Vec<State>,
    transitions: Vec<Transition>,
    next_state: u32,
    next_transition: u32,
}

impl GraphSnapshot {
    pub(crate) fn capture(automaton: &Automaton) -> Self {
        Self {
            start: automaton.start,
            states: automaton.states.clone(),
            transitions: automaton.transitions.clone(),
            next_state: automaton.next_state,
            next_transition: automaton.next_transition,
        }
    }

    /// Assemble the automaton, or report every structural violation.
    pub(crate) fn restore(self) -> Result<Automaton, NonEmptyVec<IntegrityViolation>> {
        Parts {
            start: self.start,
            states: &self.states,
            transitions: &self.transitions,
            next_state: self.next_state,
            next_transition: self.next_transition,
        }
        .check()
        .into_result()?;

        Ok(Automaton {
            start: self.start,
            states: self.states,
            transitions: self.transitions,
            next_state: self.next_state,
            next_transition: self.next_transition,
        })
    }
}
