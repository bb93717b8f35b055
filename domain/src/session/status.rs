//! Session lifecycle status and termination reasons

use serde::{Deserialize, Serialize};

/// Lifecycle of one test session.
///
/// `Completed`, `Failed` and `Aborted` are absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Created,
    Running,
    Completed,
    Failed,
    Aborted,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Created => "created",
            SessionStatus::Running => "running",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
            SessionStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionStatus::Completed | SessionStatus::Failed | SessionStatus::Aborted
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// The configured maximum number of turns was executed
    MaxTurns,
    /// The agent executed a `report` action
    Reported,
    NoQuorum,
    ValidationFailed,
    ExecutionFailed,
    /// External cancellation
    Cancelled,
}

impl TerminationReason {
    /// Terminal status this reason leads to
    pub fn status(&self) -> SessionStatus {
        match self {
            TerminationReason::MaxTurns | TerminationReason::Reported => SessionStatus::Completed,
            TerminationReason::NoQuorum
            | TerminationReason::ValidationFailed
            | TerminationReason::ExecutionFailed => SessionStatus::Failed,
            TerminationReason::Cancelled => SessionStatus::Aborted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationReason::MaxTurns => "max_turns",
            TerminationReason::Reported => "reported",
            TerminationReason::NoQuorum => "no_quorum",
            TerminationReason::ValidationFailed => "validation_failed",
            TerminationReason::ExecutionFailed => "execution_failed",
            TerminationReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!SessionStatus::Created.is_terminal());
        assert!(!SessionStatus::Running.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::Failed.is_terminal());
        assert!(SessionStatus::Aborted.is_terminal());
    }

    #[test]
    fn test_reason_status() {
        assert_eq!(TerminationReason::Reported.status(), SessionStatus::Completed);
        assert_eq!(TerminationReason::NoQuorum.status(), SessionStatus::Failed);
        assert_eq!(TerminationReason::Cancelled.status(), SessionStatus::Aborted);
    }
}
