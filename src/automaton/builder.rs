//! Builder for constructing automata from index-addressed parts.
//!
//! Persisted graphs name states by their position in state order. The
//! builder stages states and transitions in that form and only produces an
//! [`Automaton`] once everything has been validated, so a failed load never
//! exposes a half-built graph.

use super::error::BuildError;
use super::Automaton;
use crate::core::{Position, RuleSet};

#[derive(Clone, Debug)]
struct StagedState {
    position: Position,
    accepting: bool,
}

#[derive(Clone, Debug)]
struct StagedTransition {
    from: usize,
    to: usize,
    tangent: bool,
    rules: RuleSet,
}

/// Builder for constructing automata with a fluent API.
///
/// # Example
///
/// ```rust
/// use nfakit::{AutomatonBuilder, Position, RuleSet};
///
/// let nfa = AutomatonBuilder::new()
///     .start(Position::new(0, 0), false)
///     .state(Position::new(80, 0), true)
///     .transition(0, 1, false, RuleSet::from_text("a"))
///     .build()
///     .unwrap();
///
/// assert!(nfa.run("a"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    start: Option<StagedState>,
    states: Vec<StagedState>,
    transitions: Vec<StagedTransition>,
}

impl AutomatonBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start state (required). It always receives index 0.
    pub fn start(mut self, position: Position, accepting: bool) -> Self {
        self.start = Some(StagedState {
            position,
            accepting,
        });
        self
    }

    /// Append a non-start state. The first one receives index 1.
    pub fn state(mut self, position: Position, accepting: bool) -> Self {
        self.states.push(StagedState {
            position,
            accepting,
        });
        self
    }

    /// Add a transition between two state indices.
    pub fn transition(mut self, from: usize, to: usize, tangent: bool, rules: RuleSet) -> Self {
        self.transitions.push(StagedTransition {
            from,
            to,
            tangent,
            rules,
        });
        self
    }

    /// Number of staged states, counting the start state if set.
    pub fn state_count(&self) -> usize {
        self.states.len() + usize::from(self.start.is_some())
    }

    /// Build the automaton.
    /// Returns an error if the start state is missing or an index is out of range.
    pub fn build(self) -> Result<Automaton, BuildError> {
        let start = self.start.ok_or(BuildError::MissingStartState)?;
        let count = self.states.len() + 1;

        for (ordinal, t) in self.transitions.iter().enumerate() {
            for index in [t.from, t.to] {
                if index >= count {
                    return Err(BuildError::IndexOutOfRange {
                        transition: ordinal,
                        index,
                        states: count,
                    });
                }
            }
        }

        let mut automaton = Automaton::new(start.position, start.accepting);
        let mut ids = Vec::with_capacity(count);
        ids.push(automaton.start());
        for staged in self.states {
            ids.push(automaton.add_state(staged.position, staged.accepting));
        }

        for staged in self.transitions {
            automaton.push_transition(
                ids[staged.from],
                ids[staged.to],
                staged.rules,
                staged.tangent,
            );
        }

        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_validates_required_fields() {
        let result = AutomatonBuilder::new().build();
        assert!(matches!(result, Err(BuildError::MissingStartState)));
    }

    #[test]
    fn builder_rejects_out_of_range_index() {
        let result = AutomatonBuilder::new()
            .start(Position::default(), false)
            .state(Position::default(), true)
            .transition(0, 1, false, RuleSet::from_text("a"))
            .transition(1, 2, false, RuleSet::from_text("b"))
            .build();

        assert_eq!(
            result,
            Err(BuildError::IndexOutOfRange {
                transition: 1,
                index: 2,
                states: 2,
            })
        );
    }

    #[test]
    fn builder_preserves_order_and_attributes() {
        let nfa = AutomatonBuilder::new()
            .start(Position::new(1, 1), true)
            .state(Position::new(2, 2), false)
            .state(Position::new(3, 3), true)
            .transition(2, 1, true, RuleSet::from_text("xy"))
            .build()
            .unwrap();

        let positions: Vec<_> = nfa.states().iter().map(|s| s.position()).collect();
        assert_eq!(
            positions,
            vec![Position::new(1, 1), Position::new(2, 2), Position::new(3, 3)]
        );
        assert!(nfa.start_state().is_accepting());

        let t = &nfa.transitions()[0];
        assert_eq!(nfa.index_of(t.from()), Some(2));
        assert_eq!(nfa.index_of(t.to()), Some(1));
        assert!(t.is_tangent());
        assert_eq!(t.rules().to_compact(), "xy");
    }

    #[test]
    fn state_count_includes_start() {
        let builder = AutomatonBuilder::new().state(Position::default(), false);
        assert_eq!(builder.state_count(), 1);
        let builder = builder.start(Position::default(), false);
        assert_eq!(builder.state_count(), 2);
    }
}
