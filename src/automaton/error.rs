//! Errors for automaton mutation, construction and integrity checks.

use crate::core::{StateId, TransitionId};
use thiserror::Error;

/// Errors raised by graph mutation and query operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("The start state {0} cannot be removed")]
    StartStateRemoval(StateId),

    #[error("State {0} does not belong to this automaton")]
    UnknownState(StateId),

    #[error("Transition {0} does not belong to this automaton")]
    UnknownTransition(TransitionId),
}

/// Errors that can occur when building an automaton from staged parts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("Start state not specified. Call .start(position, accepting) before .build()")]
    MissingStartState,

    #[error("Transition #{transition} refers to state index {index}, but only {states} states exist")]
    IndexOutOfRange {
        transition: usize,
        index: usize,
        states: usize,
    },
}

/// A single structural problem found by an integrity check.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntegrityViolation {
    #[error("Start state {0} is not a member of the automaton")]
    StartStateMissing(StateId),

    #[error("Start state {0} is not the first state in order")]
    StartStateNotFirst(StateId),

    #[error("State handle {0} appears more than once")]
    DuplicateState(StateId),

    #[error("Transition handle {0} appears more than once")]
    DuplicateTransition(TransitionId),

    #[error("Transition {transition} points at unknown state {state}")]
    DanglingEndpoint {
        transition: TransitionId,
        state: StateId,
    },

    #[error("Handle counter is behind an existing handle ({0})")]
    StaleHandleCounter(String),
}
