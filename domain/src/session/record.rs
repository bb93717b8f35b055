//! Turn records: the audit trail of one loop iteration

use super::status::TerminationReason;
use crate::action::Action;
use crate::committee::ConsensusResult;
use crate::validation::{RefusalVerdict, ValidationOutcome};
use serde::{Deserialize, Serialize};

/// What the executor returned for an action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub observation: String,
    pub latency_secs: f64,
}

impl Execution {
    pub fn new(observation: impl Into<String>, latency_secs: f64) -> Self {
        Self {
            observation: observation.into(),
            latency_secs,
        }
    }
}

/// Why a turn ended the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnFailure {
    /// Every source abstained in Round 1
    NoQuorum { abstained: Vec<String> },
    /// A hard check blocked the action; it was never executed
    ValidationHardFailure { check: String, reason: String },
    /// The executor could not apply the action
    ExecutionFailure { reason: String },
}

impl TurnFailure {
    pub fn termination_reason(&self) -> TerminationReason {
        match self {
            TurnFailure::NoQuorum { .. } => TerminationReason::NoQuorum,
            TurnFailure::ValidationHardFailure { .. } => TerminationReason::ValidationFailed,
            TurnFailure::ExecutionFailure { .. } => TerminationReason::ExecutionFailed,
        }
    }
}

impl std::fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnFailure::NoQuorum { abstained } => {
                write!(f, "no quorum ({} sources abstained)", abstained.len())
            }
            TurnFailure::ValidationHardFailure { check, reason } => {
                write!(f, "{} check failed: {}", check, reason)
            }
            TurnFailure::ExecutionFailure { reason } => write!(f, "execution failed: {}", reason),
        }
    }
}

/// Everything that happened in one iteration of the session loop.
///
/// Stages that did not run are `None`: a NoQuorum record has no consensus,
/// a blocked action has no execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub session_id: String,
    pub turn: u32,
    /// Observation the committee saw at the start of the turn
    pub observation: String,
    pub consensus: Option<ConsensusResult>,
    pub validation: Option<ValidationOutcome>,
    pub execution: Option<Execution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal: Option<RefusalVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<TurnFailure>,
}

impl TurnRecord {
    pub fn new(session_id: impl Into<String>, turn: u32, observation: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            turn,
            observation: observation.into(),
            consensus: None,
            validation: None,
            execution: None,
            refusal: None,
            failure: None,
        }
    }

    pub fn with_consensus(mut self, consensus: ConsensusResult) -> Self {
        self.consensus = Some(consensus);
        self
    }

    pub fn with_validation(mut self, validation: ValidationOutcome) -> Self {
        self.validation = Some(validation);
        self
    }

    pub fn with_execution(mut self, execution: Execution) -> Self {
        self.execution = Some(execution);
        self
    }

    pub fn with_refusal(mut self, refusal: Option<RefusalVerdict>) -> Self {
        self.refusal = refusal;
        self
    }

    pub fn with_failure(mut self, failure: TurnFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none() && self.execution.is_some()
    }

    /// The consensus action, if the committee reached one
    pub fn action(&self) -> Option<&Action> {
        self.consensus.as_ref().map(|c| &c.action)
    }
}
