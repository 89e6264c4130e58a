//! Acceptance search errors.

use thiserror::Error;

/// Errors that can occur while deciding acceptance
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RunError {
    /// The search exceeded its configured work bound before reaching a verdict
    #[error("Search gave up after {limit} expansions on input of length {input_len}")]
    BudgetExhausted { limit: usize, input_len: usize },
}
