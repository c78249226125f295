//! Error types for preemption planning.

use thiserror::Error;

/// Result type for preemption operations.
pub type Result<T> = std::result::Result<T, PreemptionError>;

/// Errors that can occur while planning preemptions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreemptionError {
    /// Invalid preemption configuration.
    #[error("invalid preemption config: {reason}")]
    InvalidConfig {
        /// Description of why the configuration is invalid.
        reason: String,
    },

    /// No set of eligible allocations can satisfy the ask.
    #[error("no feasible preemption set: need {needed}, freeable {available}")]
    Infeasible {
        /// Resources asked for.
        needed: String,
        /// Resources the selection could free.
        available: String,
    },

    /// Configuration could not be (de)serialized.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Underlying serializer message.
        reason: String,
    },
}

impl From<serde_json::Error> for PreemptionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
