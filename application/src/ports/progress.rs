//! Progress notification port
//!
//! Defines the interface for reporting progress during a session.

use probe_domain::{ConsensusResult, ProposalRound, SessionState, TurnRecord, ValidationOutcome};

/// Callback for progress updates during a session
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (progress bars, plain lines, nothing at all).
/// Every method defaults to a no-op.
pub trait ProgressNotifier: Send + Sync {
    fn on_session_start(&self, _session_id: &str, _max_turns: u32) {}

    fn on_turn_start(&self, _turn: u32) {}

    /// Called when a committee round starts
    fn on_round_start(&self, _round: ProposalRound, _sources: usize) {}

    /// Called when one source answers (or fails) within a round
    fn on_source_complete(&self, _round: ProposalRound, _source_id: &str, _success: bool) {}

    fn on_round_complete(&self, _round: ProposalRound) {}

    fn on_consensus(&self, _consensus: &ConsensusResult) {}

    fn on_validation(&self, _outcome: &ValidationOutcome) {}

    fn on_turn_complete(&self, _record: &TurnRecord) {}

    fn on_session_end(&self, _state: &SessionState) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
