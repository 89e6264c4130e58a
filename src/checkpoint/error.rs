//! Checkpoint error types.

use crate::automaton::IntegrityViolation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Errors that can occur while writing or restoring a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The checkpoint could not be encoded as JSON
    #[error("Failed to encode checkpoint as JSON: {0}")]
    Json(#[source] serde_json::Error),

    /// The checkpoint could not be encoded or decoded as bincode
    #[error("Failed to process binary checkpoint: {0}")]
    Binary(#[source] bincode::Error),

    /// The JSON is malformed or does not describe a checkpoint
    #[error("Malformed checkpoint JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    /// Checkpoint was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The captured graph breaks one or more structural invariants
    #[error("Checkpoint graph is invalid: {}", summarize(.0))]
    InvalidGraph(NonEmptyVec<IntegrityViolation>),
}

fn summarize(violations: &NonEmptyVec<IntegrityViolation>) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CheckpointError {
    /// Every integrity violation, if the graph itself was rejected.
    pub fn violations(&self) -> Option<&NonEmptyVec<IntegrityViolation>> {
        match self {
            CheckpointError::InvalidGraph(violations) => Some(violations),
            _ => None,
        }
    }
}
