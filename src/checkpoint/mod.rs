//! Serde checkpoints of a whole automaton.
//!
//! The text format in [`crate::persist`] is the interchange format. A
//! checkpoint is the lossless alternative: it keeps state and transition
//! handles, so a restored automaton hands out the same ids as before.
//! Checkpoints are stamped with a format version, an id and a creation time.

use crate::automaton::{Automaton, GraphSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of an automaton.
///
/// The captured graph is only reachable through [`Checkpoint::restore`],
/// which validates it first.
///
/// # Example
///
/// ```rust
/// use nfakit::checkpoint::Checkpoint;
/// use nfakit::{Automaton, Position};
///
/// let nfa = Automaton::new(Position::new(0, 0), true);
/// let json = Checkpoint::capture(&nfa).to_json().unwrap();
/// let restored = Checkpoint::from_json(&json).unwrap().restore().unwrap();
/// assert_eq!(restored, nfa);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    graph: GraphSnapshot,
}

impl Checkpoint {
    /// Capture the current graph.
    pub fn capture(automaton: &Automaton) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            graph: GraphSnapshot::capture(automaton),
        }
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self).map_err(CheckpointError::Json)
    }

    /// Decode from JSON, rejecting other format versions.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self =
            serde_json::from_str(json).map_err(CheckpointError::MalformedJson)?;
        checkpoint.check_version()
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(CheckpointError::Binary)
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(CheckpointError::Binary)?;
        checkpoint.check_version()
    }

    fn check_version(self) -> Result<Self, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(self)
    }

    /// Validate the captured graph and hand it back.
    ///
    /// Every integrity violation is reported, not only the first.
    pub fn restore(self) -> Result<Automaton, CheckpointError> {
        match self.graph.restore() {
            Ok(automaton) => {
                debug!(checkpoint = %self.id, "restored checkpoint");
                Ok(automaton)
            }
            Err(violations) => {
                warn!(
                    checkpoint = %self.id,
                    violations = violations.len(),
                    "rejected checkpoint graph"
                );
                Err(CheckpointError::InvalidGraph(violations))
            }
        }
    }
}
