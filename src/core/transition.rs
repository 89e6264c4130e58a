//! Directed, labeled edges between states.

use super::rule::RuleSet;
use super::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a transition within one automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionId(pub(crate) u32);

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A directed edge from one state to another.
///
/// `from` and `to` are handles into the owning automaton, never ownership.
/// `from == to` is a self-loop. `tangent` is a rendering hint preserved for
/// round-trips and has no effect on acceptance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub(crate) id: TransitionId,
    pub(crate) from: StateId,
    pub(crate) to: StateId,
    pub(crate) rules: RuleSet,
    pub(crate) tangent: bool,
}

impl Transition {
    pub(crate) fn new(id: TransitionId, from: StateId, to: StateId, rules: RuleSet) -> Self {
        Self {
            id,
            from,
            to,
            rules,
            tangent: false,
        }
    }

    /// Handle of this transition.
    pub fn id(&self) -> TransitionId {
        self.id
    }

    /// Source state.
    pub fn from(&self) -> StateId {
        self.from
    }

    /// Target state.
    pub fn to(&self) -> StateId {
        self.to
    }

    /// Rules guarding this edge, in insertion order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Check if this edge is drawn apart from an opposite edge.
    pub fn is_tangent(&self) -> bool {
        self.tangent
    }

    /// Check if this edge starts and ends at the same state.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    pub fn has_epsilon(&self) -> bool {
        self.rules.has_epsilon()
    }

    /// Check if this edge touches `state` at either end.
    pub fn is_incident_to(&self, state: StateId) -> bool {
        self.from == state || self.to == state
    }
}
