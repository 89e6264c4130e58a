//! Automaton states.
//!
//! A state is a node with a stable handle, an acceptance flag and an opaque
//! position. Adjacency is not stored here: the owning automaton derives it
//! from its transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a state within one automaton.
///
/// Handles are never reused, so a handle kept after its state was removed
/// stays invalid instead of silently pointing at a different state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Opaque 2-D position kept for client round-trips.
///
/// The automaton never interprets it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A node of the automaton.
///
/// # Example
///
/// ```rust
/// use nfakit::{Automaton, Position};
///
/// let mut nfa = Automaton::new(Position::new(0, 0), false);
/// let id = nfa.add_state(Position::new(40, 0), true);
///
/// let state = nfa.state(id).unwrap();
/// assert!(state.is_accepting());
/// assert_eq!(state.position(), Position::new(40, 0));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub(crate) id: StateId,
    pub(crate) position: Position,
    pub(crate) accepting: bool,
}

impl State {
    pub(crate) fn new(id: StateId, position: Position, accepting: bool) -> Self {
        Self {
            id,
            position,
            accepting,
        }
    }

    /// Handle of this state.
    pub fn id(&self) -> StateId {
        self.id
    }

    /// Editor position, carried through save and load.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Check if reaching this state with no input left accepts.
    pub fn is_accepting(&self) -> bool {
        self.accepting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_accessors_return_fields() {
        let state = State::new(StateId(3), Position::new(-4, 9), true);
        assert_eq!(state.id(), StateId(3));
        assert_eq!(state.position(), Position::new(-4, 9));
        assert!(state.is_accepting());
    }

    #[test]
    fn position_from_tuple() {
        assert_eq!(Position::from((1, 2)), Position::new(1, 2));
    }

    #[test]
    fn state_id_displays_with_prefix() {
        assert_eq!(StateId(12).to_string(), "s12");
    }

    #[test]
    fn state_serializes_correctly() {
        let state = State::new(StateId(1), Position::new(10, 20), false);
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: State = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
