//! Core automaton data types.
//!
//! This module contains the plain data model of the automaton:
//! - Rules and rule sets that label transitions
//! - The `Guard` capability the acceptance engine evaluates per edge
//! - States and transitions addressed by stable handles
//!
//! Nothing here owns a graph; see [`crate::automaton`] for that.

mod guard;
mod rule;
mod state;
mod transition;

pub use guard::{Guard, Step};
pub use rule::{Rule, RuleSet, EPSILON, RESERVED_SYMBOLS};
pub use state::{Position, State, StateId};
pub use transition::{Transition, TransitionId};
