//! Proposals: one source's candidate action for one round of one turn.

use crate::action::Action;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which round of the committee protocol produced a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalRound {
    /// Round 1: each source sees only the observation
    Independent,
    /// Round 2: each source also sees its peers' Round-1 proposals
    Discussion,
}

impl ProposalRound {
    pub fn number(&self) -> u8 {
        match self {
            ProposalRound::Independent => 1,
            ProposalRound::Discussion => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalRound::Independent => "independent",
            ProposalRound::Discussion => "discussion",
        }
    }
}

impl std::fmt::Display for ProposalRound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Round {} ({})", self.number(), self.as_str())
    }
}

/// What a proposal source hands back: an action with its confidence and rationale.
///
/// Drafts carry no identity; the committee stamps source and round onto them
/// when it turns them into [`Proposal`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDraft {
    pub action: Action,
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
}

impl ProposalDraft {
    /// Build a draft, rejecting confidences that are not finite values in [0, 1]
    pub fn new(
        action: Action,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let draft = Self {
            action,
            confidence,
            rationale: rationale.into(),
        };
        draft.check()?;
        Ok(draft)
    }

    /// Re-check a draft that may have been built field by field (e.g. deserialized)
    pub fn check(&self) -> Result<(), DomainError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(DomainError::InvalidConfidence(self.confidence));
        }
        Ok(())
    }
}

/// A source's proposal, as recorded by the committee for voting and audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Human-readable source identifier
    pub source_id: String,
    /// Fixed registration index of the source within the committee
    pub source_index: usize,
    pub round: ProposalRound,
    pub action: Action,
    pub confidence: f64,
    pub rationale: String,
    /// Round 2 only: the source switched away from its Round-1 action
    #[serde(default)]
    pub changed: bool,
    /// Round 2 only: the source failed and its Round-1 proposal was carried over
    #[serde(default)]
    pub fallback: bool,
}

impl Proposal {
    pub fn from_draft(
        source_id: impl Into<String>,
        source_index: usize,
        round: ProposalRound,
        draft: ProposalDraft,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_index,
            round,
            action: draft.action,
            confidence: draft.confidence,
            rationale: draft.rationale,
            changed: false,
            fallback: false,
        }
    }

    /// A Round-2 proposal revised from `original`; `changed` is derived from the vote key.
    pub fn revised(original: &Proposal, draft: ProposalDraft) -> Self {
        let changed = !original.action.same_vote(&draft.action);
        Self {
            changed,
            ..Self::from_draft(
                original.source_id.clone(),
                original.source_index,
                ProposalRound::Discussion,
                draft,
            )
        }
    }

    /// A Round-2 stand-in that repeats `original` after the source failed
    pub fn fallback_from(original: &Proposal) -> Self {
        Self {
            round: ProposalRound::Discussion,
            changed: false,
            fallback: true,
            ..original.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;

    fn draft(target: &str, confidence: f64) -> ProposalDraft {
        ProposalDraft::new(Action::new(ActionType::Click, target), confidence, "r").unwrap()
    }

    #[test]
    fn test_draft_rejects_bad_confidence() {
        let action = Action::new(ActionType::Click, "#buy");
        assert!(ProposalDraft::new(action.clone(), 1.01, "").is_err());
        assert!(ProposalDraft::new(action.clone(), -0.1, "").is_err());
        assert!(ProposalDraft::new(action.clone(), f64::NAN, "").is_err());
        assert!(ProposalDraft::new(action, 1.0, "").is_ok());
    }

    #[test]
    fn test_revised_sets_changed() {
        let original = Proposal::from_draft("a", 0, ProposalRound::Independent, draft("#buy", 0.6));

        let kept = Proposal::revised(&original, draft("#buy", 0.9));
        assert!(!kept.changed);
        assert_eq!(kept.round, ProposalRound::Discussion);
        assert_eq!(kept.confidence, 0.9);

        let switched = Proposal::revised(&original, draft("#cart", 0.7));
        assert!(switched.changed);
        assert_eq!(switched.source_index, 0);
    }

    #[test]
    fn test_fallback_copies_original() {
        let original = Proposal::from_draft("b", 1, ProposalRound::Independent, draft("#buy", 0.4));
        let fallback = Proposal::fallback_from(&original);
        assert!(fallback.fallback);
        assert!(!fallback.changed);
        assert_eq!(fallback.round, ProposalRound::Discussion);
        assert_eq!(fallback.action, original.action);
        assert_eq!(fallback.confidence, 0.4);
    }

    #[test]
    fn test_round_display() {
        assert_eq!(ProposalRound::Discussion.to_string(), "Round 2 (discussion)");
    }
}
