//! The editable automaton graph.
//!
//! [`Automaton`] owns every state and transition. States live in insertion
//! order (which is also persisted order, start state first); transitions
//! live in a single table keyed by their endpoint handles. Incoming and
//! outgoing adjacency is derived from that table on demand, so removing an
//! edge can never leave it registered on only one of its endpoints.
//!
//! # Example
//!
//! ```rust
//! use nfakit::{Automaton, Position, RuleSet};
//!
//! let mut nfa = Automaton::new(Position::new(0, 0), false);
//! let start = nfa.start();
//! let done = nfa.add_state(Position::new(100, 0), true);
//! nfa.add_transition(start, done, RuleSet::from_text("a")).unwrap();
//!
//! assert!(nfa.run("a"));
//! assert!(!nfa.run("b"));
//! ```

mod builder;
mod error;
mod integrity;
mod snapshot;

pub use builder::AutomatonBuilder;
pub use error::{AutomatonError, BuildError, IntegrityViolation};
pub use integrity::Integrity;
pub(crate) use snapshot::GraphSnapshot;

use crate::core::{Position, RuleSet, State, StateId, Transition, TransitionId};
use crate::engine::{self, AcceptingPath, RunError, SearchLimits};
use crate::persist::{self, PersistError};
use std::path::Path;
use tracing::debug;

/// An editable nondeterministic finite automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Automaton {
    start: StateId,
    states: Vec<State>,
    transitions: Vec<Transition>,
    next_state: u32,
    next_transition: u32,
}

impl Automaton {
    /// Create an automaton holding only its start state.
    pub fn new(position: Position, accepting: bool) -> Self {
        let start = StateId(0);
        Self {
            start,
            states: vec![State::new(start, position, accepting)],
            transitions: Vec::new(),
            next_state: 1,
            next_transition: 0,
        }
    }

    // ---- states -----------------------------------------------------------

    /// Append a new state and return its handle.
    pub fn add_state(&mut self, position: Position, accepting: bool) -> StateId {
        let id = StateId(self.next_state);
        self.next_state += 1;
        self.states.push(State::new(id, position, accepting));
        debug!(state = %id, x = position.x, y = position.y, accepting, "added state");
        id
    }

    /// Remove a state together with every transition incident to it.
    ///
    /// The start state can never be removed.
    pub fn remove_state(&mut self, id: StateId) -> Result<State, AutomatonError> {
        if id == self.start {
            return Err(AutomatonError::StartStateRemoval(id));
        }
        let index = self.index_of(id).ok_or(AutomatonError::UnknownState(id))?;

        let before = self.transitions.len();
        self.transitions.retain(|t| !t.is_incident_to(id));
        let removed_edges = before - self.transitions.len();

        let state = self.states.remove(index);
        debug!(state = %id, removed_edges, "removed state");
        Ok(state)
    }

    /// Mark a state as accepting or not.
    pub fn set_accepting(&mut self, id: StateId, accepting: bool) -> Result<(), AutomatonError> {
        self.state_mut(id)?.accepting = accepting;
        Ok(())
    }

    /// Update a state's opaque position.
    pub fn move_state(&mut self, id: StateId, position: Position) -> Result<(), AutomatonError> {
        self.state_mut(id)?.position = position;
        Ok(())
    }

    /// Handle of the start state.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The start state, always first in persisted order.
    pub fn start_state(&self) -> &State {
        // Created first, never removable, and every restore path is validated.
        &self.states[0]
    }

    /// All states in persisted order, start state first.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// Look up a state by handle.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Position of a state in persisted order.
    pub fn index_of(&self, id: StateId) -> Option<usize> {
        self.states.iter().position(|s| s.id == id)
    }

    /// Number of states, start state included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// Check if `id` names a state of this automaton.
    pub fn contains_state(&self, id: StateId) -> bool {
        self.index_of(id).is_some()
    }

    fn state_mut(&mut self, id: StateId) -> Result<&mut State, AutomatonError> {
        self.states
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(AutomatonError::UnknownState(id))
    }

    // ---- transitions ------------------------------------------------------

    /// Wire a new transition between two existing states.
    ///
    /// No check is made for an existing edge between the same pair; use
    /// [`Automaton::connect`] for editor-style wiring.
    pub fn add_transition(
        &mut self,
        from: StateId,
        to: StateId,
        rules: RuleSet,
    ) -> Result<TransitionId, AutomatonError> {
        for endpoint in [from, to] {
            if !self.contains_state(endpoint) {
                return Err(AutomatonError::UnknownState(endpoint));
            }
        }
        Ok(self.push_transition(from, to, rules, false))
    }

    /// Endpoints must already be members.
    fn push_transition(
        &mut self,
        from: StateId,
        to: StateId,
        rules: RuleSet,
        tangent: bool,
    ) -> TransitionId {
        let id = TransitionId(self.next_transition);
        self.next_transition += 1;
        debug!(transition = %id, %from, %to, rules = %rules, "added transition");
        let mut transition = Transition::new(id, from, to, rules);
        transition.tangent = tangent;
        self.transitions.push(transition);
        id
    }

    /// Return the `from -> to` transition, creating an unlabeled one if none exists.
    ///
    /// A newly created edge that has an opposite `to -> from` edge marks both
    /// as tangent so they can be drawn apart.
    pub fn connect(&mut self, from: StateId, to: StateId) -> Result<TransitionId, AutomatonError> {
        if let Some(existing) = self.transitions_between(from, to) {
            return Ok(existing.id);
        }
        let id = self.add_transition(from, to, RuleSet::new())?;
        if from != to {
            if let Some(opposite) = self.transitions_between(to, from).map(|t| t.id) {
                self.set_tangent(opposite, true)?;
                self.set_tangent(id, true)?;
            }
        }
        Ok(id)
    }

    /// Detach a transition from both endpoints.
    ///
    /// Returns `None` if it was already removed.
    pub fn remove_transition(&mut self, id: TransitionId) -> Option<Transition> {
        let index = self.transitions.iter().position(|t| t.id == id)?;
        let removed = self.transitions.remove(index);
        debug!(transition = %id, "removed transition");
        Some(removed)
    }

    /// Remove a transition and clear the tangent flag of its opposite edge.
    pub fn disconnect(&mut self, id: TransitionId) -> Option<Transition> {
        let removed = self.remove_transition(id)?;
        if removed.tangent {
            if let Some(opposite) = self
                .transitions
                .iter_mut()
                .find(|t| t.from == removed.to && t.to == removed.from)
            {
                opposite.tangent = false;
            }
        }
        Some(removed)
    }

    /// Replace a transition's rules by parsing free-form text.
    pub fn set_rules_from_text(
        &mut self,
        id: TransitionId,
        text: &str,
    ) -> Result<(), AutomatonError> {
        self.set_rules(id, RuleSet::from_text(text))
    }

    /// Replace a transition's rules.
    pub fn set_rules(&mut self, id: TransitionId, rules: RuleSet) -> Result<(), AutomatonError> {
        let transition = self.transition_mut(id)?;
        debug!(transition = %id, rules = %rules, "updated rules");
        transition.rules = rules;
        Ok(())
    }

    /// Set or clear a transition's tangent flag.
    pub fn set_tangent(&mut self, id: TransitionId, tangent: bool) -> Result<(), AutomatonError> {
        self.transition_mut(id)?.tangent = tangent;
        Ok(())
    }

    /// All transitions in insertion order.
    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Look up a transition by handle.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition> {
        self.transitions.iter().find(|t| t.id == id)
    }

    /// Number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Transitions leaving `id`, in insertion order.
    pub fn transitions_out(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.from == id)
    }

    /// Transitions entering `id`, in insertion order.
    pub fn transitions_in(&self, id: StateId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.to == id)
    }

    /// First transition from `from` to `to`, if any.
    pub fn transitions_between(&self, from: StateId, to: StateId) -> Option<&Transition> {
        self.transitions_out(from).find(|t| t.to == to)
    }

    /// Transitions that carry no rules and can therefore never be taken.
    pub fn unruled_transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(|t| t.rules.is_empty())
    }

    fn transition_mut(&mut self, id: TransitionId) -> Result<&mut Transition, AutomatonError> {
        self.transitions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(AutomatonError::UnknownTransition(id))
    }

    // ---- execution --------------------------------------------------------

    /// Decide whether the automaton accepts `input`.
    ///
    /// Always terminates, including on graphs with epsilon cycles.
    pub fn run(&self, input: &str) -> bool {
        match engine::search(self, input, &SearchLimits::unbounded()) {
            Ok(path) => path.is_some(),
            // An unbounded search never exhausts its budget.
            Err(_) => false,
        }
    }

    /// Run with an explicit work bound, failing closed when it is exceeded.
    pub fn try_run(&self, input: &str, limits: &SearchLimits) -> Result<bool, RunError> {
        engine::search(self, input, limits).map(|path| path.is_some())
    }

    /// Find the first accepting path for `input`, in exploration order.
    pub fn accepting_path(&self, input: &str) -> Option<AcceptingPath> {
        engine::search(self, input, &SearchLimits::unbounded())
            .ok()
            .flatten()
    }

    // ---- persistence ------------------------------------------------------

    /// Write the automaton to `path` in the line-oriented text format.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::save(self, path.as_ref())
    }

    /// Read an automaton from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        persist::load(path.as_ref())
    }

    /// Replace this automaton with the one stored at `path`.
    ///
    /// On any error `self` is left untouched.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        *self = persist::load(path.as_ref())?;
        Ok(())
    }

    /// Encode as the text format.
    pub fn to_text(&self) -> String {
        persist::encode(self)
    }

    /// Decode from the text format.
    pub fn from_text(text: &str) -> Result<Self, PersistError> {
        persist::decode(text).map_err(PersistError::from)
    }
}
