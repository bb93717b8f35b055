//! Committee consensus result

use super::ordering::TieBreakOrder;
use super::policy::ConsensusPolicy;
use super::proposal::{Proposal, ProposalRound};
use super::vote::{Tally, VoteGroup};
use crate::action::Action;
use serde::{Deserialize, Serialize};

/// The committee's decision for one turn
///
/// Produced once per turn and never modified. The winning action is always
/// the action of a final-round proposal; the committee cannot invent one.
///
/// # Example
///
/// ```
/// use probe_domain::{Action, ConsensusPolicy, ConsensusResult, Proposal, ProposalDraft, ProposalRound};
/// use probe_domain::committee::TieBreakOrder;
///
/// let vote = |i: usize, target: &str, confidence: f64| {
///     let draft = ProposalDraft::new(Action::new("click", target), confidence, "").unwrap();
///     Proposal::from_draft(format!("agent-{}", i), i, ProposalRound::Independent, draft)
/// };
/// let finals = vec![vote(0, "A", 0.6), vote(1, "A", 0.7), vote(2, "B", 0.9)];
///
/// let result = ConsensusResult::decide(
///     finals.clone(),
///     finals,
///     vec![],
///     &ConsensusPolicy::default(),
///     &TieBreakOrder::identity(3),
/// )
/// .unwrap();
/// assert_eq!(result.action.target, "A");
/// assert_eq!(result.dissent, vec!["agent-2".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// The winning action
    pub action: Action,
    /// Winning group size over the number of final-round proposals
    pub agreement: f64,
    /// Winning group's score (summed confidence, or head count when unweighted)
    pub score: f64,
    pub confidence_weighted: bool,
    /// Agreement fell below the policy's minimum; downstream decides what that means
    pub low_agreement: bool,
    /// Every scored group, winner first
    pub votes: Vec<VoteGroup>,
    /// All proposals from every round, in round then registration order
    pub proposals: Vec<Proposal>,
    /// Sources that abstained in Round 1
    pub abstained: Vec<String>,
    /// Sources whose final proposal lost the vote
    pub dissent: Vec<String>,
}

impl ConsensusResult {
    /// Tally `final_round` and build the result.
    ///
    /// `history` is every proposal recorded this turn (including `final_round`
    /// entries) and is kept for audit only. Returns `None` when `final_round`
    /// is empty.
    pub fn decide(
        final_round: Vec<Proposal>,
        mut history: Vec<Proposal>,
        abstained: Vec<String>,
        policy: &ConsensusPolicy,
        order: &TieBreakOrder,
    ) -> Option<Self> {
        let tally = Tally::count(&final_round, policy, order)?;
        let winner = tally.winner();
        let agreement = tally.agreement();

        let action = final_round[tally.representative].action.clone();
        let dissent = final_round
            .iter()
            .filter(|p| !p.action.same_vote(&action))
            .map(|p| p.source_id.clone())
            .collect();

        history.sort_by_key(|p| (p.round, p.source_index));

        Some(Self {
            action,
            agreement,
            score: winner.score,
            confidence_weighted: policy.confidence_weighting,
            low_agreement: policy.is_low_agreement(agreement),
            votes: tally.groups.clone(),
            proposals: history,
            abstained,
            dissent,
        })
    }

    /// Proposals from one round
    pub fn round(&self, round: ProposalRound) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter().filter(move |p| p.round == round)
    }

    /// Number of sources that switched their vote during discussion
    pub fn changed_count(&self) -> usize {
        self.round(ProposalRound::Discussion)
            .filter(|p| p.changed)
            .count()
    }

    pub fn is_unanimous(&self) -> bool {
        self.dissent.is_empty()
    }

    /// Visual vote summary, one mark per final-round vote (e.g. "[●●○]")
    pub fn vote_summary(&self) -> String {
        let total: usize = self.votes.iter().map(VoteGroup::size).sum();
        let agreeing = self.votes.first().map(VoteGroup::size).unwrap_or(0);
        let mut summary = String::from("[");
        summary.extend(std::iter::repeat_n('●', agreeing));
        summary.extend(std::iter::repeat_n('○', total - agreeing));
        summary.push(']');
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;
    use crate::committee::proposal::ProposalDraft;

    fn vote(index: usize, round: ProposalRound, target: &str, confidence: f64) -> Proposal {
        Proposal::from_draft(
            format!("agent-{}", index),
            index,
            round,
            ProposalDraft::new(Action::new(ActionType::Click, target), confidence, "").unwrap(),
        )
    }

    #[test]
    fn test_decide_scenario() {
        let finals = vec![
            vote(0, ProposalRound::Discussion, "A", 0.6),
            vote(1, ProposalRound::Discussion, "A", 0.7),
            vote(2, ProposalRound::Discussion, "B", 0.9),
        ];
        let result = ConsensusResult::decide(
            finals.clone(),
            finals,
            vec![],
            &ConsensusPolicy::default(),
            &TieBreakOrder::identity(3),
        )
        .unwrap();

        assert_eq!(result.action.target, "A");
        assert!((result.score - 1.3).abs() < 1e-12);
        assert!((result.agreement - 2.0 / 3.0).abs() < 1e-12);
        assert!(!result.low_agreement);
        assert_eq!(result.dissent, vec!["agent-2"]);
        assert_eq!(result.vote_summary(), "[●●○]");
    }

    #[test]
    fn test_low_agreement_is_flagged_not_suppressed() {
        let finals = vec![
            vote(0, ProposalRound::Independent, "A", 0.9),
            vote(1, ProposalRound::Independent, "B", 0.5),
            vote(2, ProposalRound::Independent, "C", 0.4),
        ];
        let result = ConsensusResult::decide(
            finals.clone(),
            finals,
            vec!["agent-3".into()],
            &ConsensusPolicy::default(),
            &TieBreakOrder::identity(4),
        )
        .unwrap();

        assert_eq!(result.action.target, "A");
        assert!(result.low_agreement);
        assert_eq!(result.abstained, vec!["agent-3"]);
    }

    #[test]
    fn test_history_sorted_by_round_then_source() {
        let history = vec![
            vote(1, ProposalRound::Discussion, "A", 0.5),
            vote(0, ProposalRound::Discussion, "A", 0.5),
            vote(1, ProposalRound::Independent, "B", 0.5),
            vote(0, ProposalRound::Independent, "A", 0.5),
        ];
        let finals = history[..2].to_vec();
        let result = ConsensusResult::decide(
            finals,
            history,
            vec![],
            &ConsensusPolicy::default(),
            &TieBreakOrder::identity(2),
        )
        .unwrap();

        let order: Vec<_> = result
            .proposals
            .iter()
            .map(|p| (p.round.number(), p.source_index))
            .collect();
        assert_eq!(order, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
        assert_eq!(result.round(ProposalRound::Independent).count(), 2);
        assert!(result.is_unanimous());
    }

    #[test]
    fn test_winner_always_from_final_round() {
        let finals = vec![
            vote(0, ProposalRound::Discussion, "X", 0.3),
            vote(1, ProposalRound::Discussion, "Y", 0.8),
        ];
        let result = ConsensusResult::decide(
            finals.clone(),
            finals.clone(),
            vec![],
            &ConsensusPolicy::default(),
            &TieBreakOrder::from_seed(2, 9),
        )
        .unwrap();
        assert!(finals.iter().any(|p| p.action.same_vote(&result.action)));
    }

    #[test]
    fn test_decide_empty() {
        assert!(
            ConsensusResult::decide(
                vec![],
                vec![],
                vec![],
                &ConsensusPolicy::default(),
                &TieBreakOrder::identity(0)
            )
            .is_none()
        );
    }
}
