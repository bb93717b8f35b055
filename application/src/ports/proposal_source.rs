//! Proposal source port
//!
//! A proposal source is one committee member: a local model wrapper, a
//! remote API client, a scripted mock. The committee only ever sees this
//! trait.

use async_trait::async_trait;
use probe_domain::{DomainError, Persona, Proposal, ProposalDraft};
use thiserror::Error;

/// Errors a single source can report for one invocation.
///
/// These never end a session on their own: the committee absorbs them
/// (abstain in Round 1, fall back in Round 2).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("Timeout")]
    Timeout,

    #[error("Malformed proposal: {0}")]
    Malformed(String),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<DomainError> for SourceError {
    fn from(error: DomainError) -> Self {
        if error.is_malformed() {
            SourceError::Malformed(error.to_string())
        } else {
            SourceError::Other(error.to_string())
        }
    }
}

/// One member of the committee
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// Stable identifier used in proposals and logs
    fn id(&self) -> &str;

    /// Propose an action for `observation`.
    ///
    /// `peers` is `None` in Round 1. In Round 2 it holds the Round-1
    /// proposals of every *other* surviving source.
    async fn propose(
        &self,
        observation: &str,
        persona: &Persona,
        peers: Option<&[Proposal]>,
    ) -> Result<ProposalDraft, SourceError>;
}
