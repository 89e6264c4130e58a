//! Guard capability for transition labels.
//!
//! The acceptance engine never inspects a label directly. It asks the
//! label's [`Guard`] what traversing the edge would do with the next input
//! symbol, which keeps the search loop independent of the label kind.

/// Outcome of evaluating a guard against the next input symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Edge may be traversed without consuming input
    Stay,

    /// Edge may be traversed, consuming the next symbol
    Consume,

    /// Edge cannot be traversed here
    Blocked,
}

/// Capability implemented by anything that can label an edge.
///
/// `next` is `None` once the input is exhausted. Implementations must be
/// pure: the same `next` always yields the same [`Step`].
///
/// # Example
///
/// ```rust
/// use nfakit::core::{Guard, Rule, Step};
///
/// assert_eq!(Rule::Symbol('a').step(Some('a')), Step::Consume);
/// assert_eq!(Rule::Symbol('a').step(Some('b')), Step::Blocked);
/// assert_eq!(Rule::Epsilon.step(None), Step::Stay);
/// ```
pub trait Guard {
    /// Decide how this guard treats the next input symbol.
    fn step(&self, next: Option<char>) -> Step;

    /// Check whether this guard traverses without consuming input.
    fn is_silent(&self) -> bool {
        self.step(None) == Step::Stay
    }
}
