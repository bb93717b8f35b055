//! Session state and its guarded transitions

use super::record::TurnRecord;
use super::status::{SessionStatus, TerminationReason};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Running state of one test session.
///
/// All mutation goes through the transition methods below, which refuse to
/// touch a session in a terminal status. The turn counter counts executed
/// turns only; a failed iteration is recorded under `turn_counter + 1`
/// without advancing it.
///
/// # Example
///
/// ```
/// use probe_domain::session::{Execution, SessionState, SessionStatus, TerminationReason, TurnRecord};
///
/// let mut state = SessionState::new("s-1", "home page");
/// state.start().unwrap();
///
/// let record = TurnRecord::new("s-1", state.next_turn(), "home page")
///     .with_execution(Execution::new("search results", 0.2));
/// state.record_success(record).unwrap();
/// assert_eq!(state.turn_counter, 1);
/// assert_eq!(state.observation, "search results");
///
/// state.finish(TerminationReason::MaxTurns).unwrap();
/// assert_eq!(state.status, SessionStatus::Completed);
/// assert!(state.start().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub id: String,
    pub status: SessionStatus,
    /// Every emitted record, successful or not, in turn order
    pub turns: Vec<TurnRecord>,
    /// Observation the next turn starts from
    pub observation: String,
    pub turn_counter: u32,
    pub termination: Option<TerminationReason>,
}

impl SessionState {
    pub fn new(id: impl Into<String>, initial_observation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: SessionStatus::Created,
            turns: Vec::new(),
            observation: initial_observation.into(),
            turn_counter: 0,
            termination: None,
        }
    }

    /// Number the next iteration's record will carry
    pub fn next_turn(&self) -> u32 {
        self.turn_counter + 1
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn start(&mut self) -> Result<(), DomainError> {
        self.ensure_not_terminal()?;
        self.status = SessionStatus::Running;
        Ok(())
    }

    /// Append a successful turn, adopt its observation and advance the counter
    pub fn record_success(&mut self, record: TurnRecord) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.ensure_sequence(&record)?;
        if let Some(execution) = &record.execution {
            self.observation = execution.observation.clone();
        }
        self.turns.push(record);
        self.turn_counter += 1;
        Ok(())
    }

    /// Append a failed turn and move to `Failed`.
    ///
    /// The counter is not advanced: the turn was not executed.
    pub fn record_failure(&mut self, record: TurnRecord) -> Result<TerminationReason, DomainError> {
        self.ensure_running()?;
        self.ensure_sequence(&record)?;
        let reason = record
            .failure
            .as_ref()
            .map(|f| f.termination_reason())
            .unwrap_or(TerminationReason::ExecutionFailed);
        self.turns.push(record);
        self.status = reason.status();
        self.termination = Some(reason);
        Ok(reason)
    }

    /// Move to the terminal status `reason` implies
    pub fn finish(&mut self, reason: TerminationReason) -> Result<(), DomainError> {
        self.ensure_not_terminal()?;
        self.status = reason.status();
        self.termination = Some(reason);
        Ok(())
    }

    pub fn abort(&mut self) -> Result<(), DomainError> {
        self.finish(TerminationReason::Cancelled)
    }

    /// Termination check after a successful turn: max turns first, then report
    pub fn completion_reason(&self, max_turns: u32) -> Option<TerminationReason> {
        if self.turn_counter >= max_turns {
            return Some(TerminationReason::MaxTurns);
        }
        let reported = self
            .turns
            .last()
            .filter(|r| r.is_success())
            .and_then(|r| r.action())
            .is_some_and(|a| a.is_report());
        reported.then_some(TerminationReason::Reported)
    }

    fn ensure_not_terminal(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::SessionTerminated {
                session_id: self.id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        self.ensure_not_terminal()?;
        if self.status != SessionStatus::Running {
            return Err(DomainError::SessionNotStarted {
                session_id: self.id.clone(),
            });
        }
        Ok(())
    }

    fn ensure_sequence(&self, record: &TurnRecord) -> Result<(), DomainError> {
        let expected = self.next_turn();
        if record.turn != expected {
            return Err(DomainError::TurnOutOfSequence {
                expected,
                got: record.turn,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, ActionType};
    use crate::committee::{ConsensusPolicy, ConsensusResult, Proposal, ProposalDraft, ProposalRound, TieBreakOrder};
    use crate::session::record::{Execution, TurnFailure};

    fn consensus(action: Action) -> ConsensusResult {
        let draft = ProposalDraft::new(action, 0.9, "").unwrap();
        let finals = vec![Proposal::from_draft("a", 0, ProposalRound::Independent, draft)];
        ConsensusResult::decide(
            finals.clone(),
            finals,
            vec![],
            &ConsensusPolicy::default(),
            &TieBreakOrder::identity(1),
        )
        .unwrap()
    }

    fn success(state: &SessionState, action: Action) -> TurnRecord {
        TurnRecord::new(&state.id, state.next_turn(), &state.observation)
            .with_consensus(consensus(action))
            .with_execution(Execution::new(format!("after turn {}", state.next_turn()), 0.1))
    }

    fn running() -> SessionState {
        let mut state = SessionState::new("s-1", "start");
        state.start().unwrap();
        state
    }

    #[test]
    fn test_record_before_start_rejected() {
        let mut state = SessionState::new("s-1", "start");
        let record = TurnRecord::new("s-1", 1, "start");
        assert!(matches!(
            state.record_success(record),
            Err(DomainError::SessionNotStarted { .. })
        ));
    }

    #[test]
    fn test_counter_advances_per_success() {
        let mut state = running();
        for _ in 0..3 {
            let record = success(&state, Action::new(ActionType::Scroll, "down"));
            state.record_success(record).unwrap();
        }
        assert_eq!(state.turn_counter, 3);
        assert_eq!(state.observation, "after turn 3");
        let numbers: Vec<u32> = state.turns.iter().map(|t| t.turn).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_out_of_sequence_rejected() {
        let mut state = running();
        let record = TurnRecord::new("s-1", 2, "start");
        assert_eq!(
            state.record_success(record),
            Err(DomainError::TurnOutOfSequence { expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_failure_does_not_advance_counter() {
        let mut state = running();
        let record = TurnRecord::new("s-1", 1, "start").with_failure(TurnFailure::NoQuorum {
            abstained: vec!["a".into()],
        });
        let reason = state.record_failure(record).unwrap();
        assert_eq!(reason, TerminationReason::NoQuorum);
        assert_eq!(state.status, SessionStatus::Failed);
        assert_eq!(state.turn_counter, 0);
        assert_eq!(state.turns.len(), 1);
    }

    #[test]
    fn test_terminal_is_absorbing() {
        let mut state = running();
        state.abort().unwrap();
        assert_eq!(state.status, SessionStatus::Aborted);
        assert!(state.finish(TerminationReason::MaxTurns).is_err());
        assert!(state.start().is_err());
        let record = TurnRecord::new("s-1", 1, "start");
        assert!(matches!(
            state.record_success(record),
            Err(DomainError::SessionTerminated { .. })
        ));
        assert_eq!(state.status, SessionStatus::Aborted);
    }

    #[test]
    fn test_completion_reason_order() {
        let mut state = running();
        assert_eq!(state.completion_reason(3), None);

        let record = success(&state, Action::report("done", "task complete"));
        state.record_success(record).unwrap();
        assert_eq!(state.completion_reason(3), Some(TerminationReason::Reported));
        // Max turns wins when both hold
        assert_eq!(state.completion_reason(1), Some(TerminationReason::MaxTurns));
    }
}
