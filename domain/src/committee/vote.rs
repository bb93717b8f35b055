//! Round-3 vote tallying
//!
//! Final-round proposals are grouped by (action type, target). Each group is
//! scored by summed confidence or by head count, depending on the policy, and
//! the highest-scoring group wins. Score ties go to the group whose best
//! member comes first in the seeded [`TieBreakOrder`].

use super::ordering::TieBreakOrder;
use super::policy::ConsensusPolicy;
use super::proposal::Proposal;
use crate::action::ActionType;
use serde::{Deserialize, Serialize};

/// Scores closer than this are a tie
pub const SCORE_EPSILON: f64 = 1e-9;

/// All final-round proposals that voted for the same (type, target)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteGroup {
    pub action_type: ActionType,
    pub target: String,
    /// Registration indices of the members, ascending
    pub members: Vec<usize>,
    pub score: f64,
    /// Lowest tie-break rank among the members
    pub best_rank: usize,
}

impl VoteGroup {
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn label(&self) -> String {
        format!("{}::{}", self.action_type, self.target)
    }

    /// Whether `self` beats `other`: higher score, or equal score and better rank
    fn beats(&self, other: &VoteGroup) -> bool {
        if self.score > other.score + SCORE_EPSILON {
            return true;
        }
        (self.score - other.score).abs() <= SCORE_EPSILON && self.best_rank < other.best_rank
    }
}

/// Outcome of grouping and scoring one round of proposals
#[derive(Debug, Clone, PartialEq)]
pub struct Tally {
    /// Groups ordered winner first, then by descending score and rank
    pub groups: Vec<VoteGroup>,
    /// Index into the tallied proposals of the winning group's representative
    pub representative: usize,
    /// Number of proposals tallied
    pub total: usize,
}

impl Tally {
    /// Group and score `proposals`; `None` when there is nothing to count.
    pub fn count(
        proposals: &[Proposal],
        policy: &ConsensusPolicy,
        order: &TieBreakOrder,
    ) -> Option<Self> {
        if proposals.is_empty() {
            return None;
        }

        let mut groups: Vec<VoteGroup> = Vec::new();
        for proposal in proposals {
            let weight = if policy.confidence_weighting {
                proposal.confidence
            } else {
                1.0
            };
            let rank = order.rank(proposal.source_index);
            let (action_type, target) = proposal.action.key();

            match groups
                .iter_mut()
                .find(|g| g.action_type == action_type && g.target == target)
            {
                Some(group) => {
                    group.members.push(proposal.source_index);
                    group.score += weight;
                    group.best_rank = group.best_rank.min(rank);
                }
                None => groups.push(VoteGroup {
                    action_type,
                    target,
                    members: vec![proposal.source_index],
                    score: weight,
                    best_rank: rank,
                }),
            }
        }
        for group in &mut groups {
            group.members.sort_unstable();
        }

        let mut winner = 0;
        for (i, group) in groups.iter().enumerate().skip(1) {
            if group.beats(&groups[winner]) {
                winner = i;
            }
        }
        let winning = groups.remove(winner);

        // The representative is the winning member that ranks first
        let representative = proposals
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.action.action_type == winning.action_type && p.action.target == winning.target
            })
            .min_by_key(|(_, p)| order.rank(p.source_index))
            .map(|(i, _)| i)?;

        groups.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.best_rank.cmp(&b.best_rank))
        });
        groups.insert(0, winning);

        Some(Self {
            groups,
            representative,
            total: proposals.len(),
        })
    }

    pub fn winner(&self) -> &VoteGroup {
        &self.groups[0]
    }

    /// Fraction of tallied proposals that voted with the winner
    pub fn agreement(&self) -> f64 {
        self.winner().size() as f64 / self.total as f64
    }
}
