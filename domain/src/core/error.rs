//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Committee has no proposal sources")]
    EmptyCommittee,

    #[error("Confidence must be a finite value in [0, 1], got {0}")]
    InvalidConfidence(f64),

    #[error("Noise level must be in [0, 1], got {0}")]
    InvalidNoiseLevel(f64),

    #[error("Malformed proposal: {0}")]
    MalformedProposal(String),

    #[error("Session {session_id} is already {status}; no further turns are accepted")]
    SessionTerminated { session_id: String, status: String },

    #[error("Session {session_id} has not been started")]
    SessionNotStarted { session_id: String },

    #[error("Turn {got} is out of sequence (expected {expected})")]
    TurnOutOfSequence { expected: u32, got: u32 },
}

impl DomainError {
    /// Whether this error came from a proposal that could not be understood
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedProposal(_) | DomainError::InvalidConfidence(_)
        )
    }
}
