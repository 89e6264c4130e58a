//! Nondeterministic acceptance search.
//!
//! The search is a depth-first walk over configurations `(state, input
//! position)`, starting at the start state with the whole input remaining.
//! From each configuration every outgoing transition is tried in insertion
//! order, and within a transition every rule in insertion order:
//!
//! - an epsilon rule moves to the target without consuming input, except on
//!   a self-loop, which is never taken;
//! - a symbol rule moves to the target consuming the next input symbol when
//!   it matches.
//!
//! A configuration is accepting when no input remains and its state is
//! accepting. The first accepting configuration found ends the search.
//!
//! Each configuration is expanded at most once per search. Reaching it again
//! can only repeat work already done, so this bounds the search by
//! `states * (input length + 1)` expansions and guarantees termination on
//! epsilon cycles of any length without changing which inputs are accepted.
//! The walk uses an explicit stack, so long inputs cannot overflow the call
//! stack either.

mod error;

pub use error::RunError;

use crate::automaton::Automaton;
use crate::core::{Guard, Rule, StateId, Step, Transition, TransitionId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace, warn};

/// Work bound for a single search.
///
/// With no bound the search still terminates; a bound only caps the amount
/// of work spent on very large graphs or inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of configurations to expand
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    /// No limit; the search still terminates.
    pub fn unbounded() -> Self {
        Self {
            max_expansions: None,
        }
    }

    /// Stop after `max` configurations have been expanded.
    pub fn with_max_expansions(max: usize) -> Self {
        Self {
            max_expansions: Some(max),
        }
    }
}

/// One traversed edge of an accepting path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hop {
    pub transition: TransitionId,
    pub rule: Rule,
    pub to: StateId,
}

/// The first accepting path found for an input.
///
/// # Example
///
/// ```rust
/// use nfakit::{Automaton, Position, RuleSet};
///
/// let mut nfa = Automaton::new(Position::new(0, 0), false);
/// let s = nfa.start();
/// let a = nfa.add_state(Position::new(50, 0), false);
/// let f = nfa.add_state(Position::new(100, 0), true);
/// nfa.add_transition(s, a, RuleSet::from_text("a")).unwrap();
/// nfa.add_transition(a, f, RuleSet::from_text("\u{025B}")).unwrap();
///
/// let path = nfa.accepting_path("a").unwrap();
/// assert_eq!(path.states(), vec![s, a, f]);
/// assert_eq!(path.consumed(), "a");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcceptingPath {
    start: StateId,
    hops: Vec<Hop>,
}

impl AcceptingPath {
    pub fn start(&self) -> StateId {
        self.start
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    /// States visited in order, starting with the start state.
    pub fn states(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.hops.len() + 1);
        path.push(self.start);
        path.extend(self.hops.iter().map(|h| h.to));
        path
    }

    /// The input symbols consumed along the path.
    pub fn consumed(&self) -> String {
        self.hops
            .iter()
            .filter_map(|h| match h.rule {
                Rule::Symbol(c) => Some(c),
                Rule::Epsilon => None,
            })
            .collect()
    }

    /// Number of edges traversed.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }
}

#[derive(Clone, Copy, Debug)]
struct Node {
    state: usize,
    pos: usize,
    parent: Option<usize>,
    via: Option<(TransitionId, Rule)>,
}

/// Read-only view of an automaton prepared for repeated searches.
///
/// Adjacency is computed once, so testing many inputs against the same
/// graph does not rescan the transition table each time.
pub struct Runner<'a> {
    ids: Vec<StateId>,
    accepting: Vec<bool>,
    outgoing: Vec<Vec<(&'a Transition, usize)>>,
}

impl<'a> Runner<'a> {
    /// Index the automaton's adjacency for repeated searches.
    pub fn new(automaton: &'a Automaton) -> Self {
        let states = automaton.states();
        let dense: HashMap<StateId, usize> = states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id(), i))
            .collect();

        let mut outgoing: Vec<Vec<(&Transition, usize)>> = vec![Vec::new(); states.len()];
        for t in automaton.transitions() {
            if let (Some(&from), Some(&to)) = (dense.get(&t.from()), dense.get(&t.to())) {
                outgoing[from].push((t, to));
            }
        }

        let unruled = automaton.unruled_transitions().count();
        if unruled > 0 {
            debug!(unruled, "transitions without rules can never be taken");
        }

        Self {
            ids: states.iter().map(|s| s.id()).collect(),
            accepting: states.iter().map(|s| s.is_accepting()).collect(),
            outgoing,
        }
    }

    /// Decide acceptance, ignoring the path.
    pub fn accepts(&self, input: &str) -> bool {
        matches!(self.search(input, &SearchLimits::unbounded()), Ok(Some(_)))
    }

    /// Search for an accepting path within `limits`.
    pub fn search(
        &self,
        input: &str,
        limits: &SearchLimits,
    ) -> Result<Option<AcceptingPath>, RunError> {
        let input: Vec<char> = input.chars().collect();
        if self.ids.is_empty() {
            return Ok(None);
        }

        let mut stack = vec![Node {
            state: 0,
            pos: 0,
            parent: None,
            via: None,
        }];
        let mut visited: HashSet<(usize, usize)> = HashSet::new();
        let mut trail: Vec<Node> = Vec::new();
        let mut children: Vec<Node> = Vec::new();

        while let Some(node) = stack.pop() {
            if !visited.insert((node.state, node.pos)) {
                continue;
            }
            if let Some(limit) = limits.max_expansions {
                if trail.len() >= limit {
                    warn!(limit, input_len = input.len(), "acceptance search budget exhausted");
                    return Err(RunError::BudgetExhausted {
                        limit,
                        input_len: input.len(),
                    });
                }
            }

            let index = trail.len();
            trail.push(node);

            if node.pos == input.len() && self.accepting[node.state] {
                trace!(expansions = trail.len(), "accepting configuration reached");
                return Ok(Some(self.reconstruct(&trail, index)));
            }

            let next = input.get(node.pos).copied();
            children.clear();
            for &(transition, target) in &self.outgoing[node.state] {
                for rule in transition.rules() {
                    let pos = match rule.step(next) {
                        Step::Stay if transition.is_self_loop() => continue,
                        Step::Stay => node.pos,
                        Step::Consume if next.is_some() => node.pos + 1,
                        Step::Consume | Step::Blocked => continue,
                    };
                    children.push(Node {
                        state: target,
                        pos,
                        parent: Some(index),
                        via: Some((transition.id(), *rule)),
                    });
                }
            }
            // Reverse so the first child is explored first.
            stack.extend(children.drain(..).rev());
        }

        trace!(expansions = trail.len(), "no accepting configuration");
        Ok(None)
    }

    fn reconstruct(&self, trail: &[Node], mut index: usize) -> AcceptingPath {
        let mut hops = Vec::new();
        loop {
            let node = trail[index];
            match (node.parent, node.via) {
                (Some(parent), Some((transition, rule))) => {
                    hops.push(Hop {
                        transition,
                        rule,
                        to: self.ids[node.state],
                    });
                    index = parent;
                }
                _ => break,
            }
        }
        hops.reverse();
        AcceptingPath {
            start: self.ids[0],
            hops,
        }
    }
}

/// Search `automaton` for an accepting path for `input`.
pub fn search(
    automaton: &Automaton,
    input: &str,
    limits: &SearchLimits,
) -> Result<Option<AcceptingPath>, RunError> {
    Runner::new(automaton).search(input, limits)
}
