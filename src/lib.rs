//! nfakit: an editable nondeterministic finite automaton
//!
//! An [`Automaton`] is a directed graph of states and labeled transitions
//! that an editor mutates in place, a tester runs against input strings,
//! and a persistence layer saves to and restores from a small text format.
//!
//! # Core Concepts
//!
//! - **Rules**: single-symbol or epsilon guards on a transition
//! - **Automaton**: arena of states and transitions with cascading removal
//! - **Engine**: terminating nondeterministic acceptance search
//! - **Persistence**: line-oriented text format and serde checkpoints
//!
//! # Example
//!
//! ```rust
//! use nfakit::{Automaton, Position, EPSILON};
//!
//! let mut nfa = Automaton::new(Position::new(0, 0), false);
//! let start = nfa.start();
//! let middle = nfa.add_state(Position::new(100, 0), false);
//! let done = nfa.add_state(Position::new(200, 0), true);
//!
//! let t = nfa.connect(start, middle).unwrap();
//! nfa.set_rules_from_text(t, "a, b").unwrap();
//! let t = nfa.connect(middle, done).unwrap();
//! nfa.set_rules_from_text(t, &EPSILON.to_string()).unwrap();
//!
//! assert!(nfa.run("a"));
//! assert!(nfa.run("b"));
//! assert!(!nfa.run("ab"));
//!
//! let restored = Automaton::from_text(&nfa.to_text()).unwrap();
//! assert_eq!(restored.state_count(), 3);
//! ```

pub mod automaton;
pub mod checkpoint;
pub mod core;
pub mod engine;
pub mod persist;

// Re-export commonly used types
pub use crate::automaton::{Automaton, AutomatonBuilder, AutomatonError};
pub use crate::core::{
    Guard, Position, Rule, RuleSet, State, StateId, Transition, TransitionId, EPSILON,
};
pub use crate::engine::{AcceptingPath, RunError, SearchLimits};
pub use crate::persist::{FormatError, FormatErrorKind, PersistError};
