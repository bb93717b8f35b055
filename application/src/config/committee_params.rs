//! Committee parameters: how the engine runs its rounds and tallies votes.

use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use probe_domain::ConsensusPolicy;
use std::time::Duration;

/// Parameters for [`RunCommitteeUseCase`](crate::use_cases::run_committee::RunCommitteeUseCase).
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeParams {
    pub policy: ConsensusPolicy,
    /// Seeds the one-time tie-break permutation; affects nothing else
    pub seed: u64,
    /// Upper bound on a single source invocation
    pub source_timeout: Duration,
    /// Run Round 2; when off, Round-1 proposals go straight to the vote
    pub enable_discussion: bool,
}

impl Default for CommitteeParams {
    fn default() -> Self {
        Self {
            policy: ConsensusPolicy::default(),
            seed: 42,
            source_timeout: Duration::from_secs(30),
            enable_discussion: true,
        }
    }
}

impl CommitteeParams {
    // ==================== Builder Methods ====================

    pub fn with_policy(mut self, policy: ConsensusPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn without_discussion(mut self) -> Self {
        self.enable_discussion = false;
        self
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        let min = self.policy.min_agreement;
        if !(0.0..=1.0).contains(&min) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "committee.min_agreement".to_string(),
                },
                format!("min_agreement must be in [0, 1], got {}", min),
            ));
        }
        if self.source_timeout.is_zero() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "committee.source_timeout_secs".to_string(),
                },
                "source timeout must be greater than zero",
            ));
        }
        issues
    }
}
