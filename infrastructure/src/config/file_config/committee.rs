//! Committee configuration from TOML (`[committee]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [committee]
//! size = 3                    # number of committee members
//! min_agreement = 0.5         # below this, a consensus is flagged low-agreement
//! confidence_weighting = true # score groups by summed confidence
//! seed = 42                   # tie-break ordering only
//! source_timeout_secs = 30
//! enable_discussion = true
//! ```

use probe_application::CommitteeParams;
use probe_domain::ConsensusPolicy;
use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCommitteeConfig {
    /// Committee size N; source definitions are cycled to fill it
    pub size: usize,
    pub min_agreement: f64,
    pub confidence_weighting: bool,
    pub seed: u64,
    pub source_timeout_secs: u64,
    pub enable_discussion: bool,
}

impl Default for FileCommitteeConfig {
    fn default() -> Self {
        Self {
            size: 3,
            min_agreement: 0.5,
            confidence_weighting: true,
            seed: 42,
            source_timeout_secs: 30,
            enable_discussion: true,
        }
    }
}

impl FileCommitteeConfig {
    pub fn to_params(&self) -> CommitteeParams {
        let params = CommitteeParams::default()
            .with_policy(
                ConsensusPolicy::default()
                    .with_min_agreement(self.min_agreement)
                    .with_confidence_weighting(self.confidence_weighting),
            )
            .with_seed(self.seed)
            .with_source_timeout(Duration::from_secs(self.source_timeout_secs));
        if self.enable_discussion {
            params
        } else {
            params.without_discussion()
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.size == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCommittee,
                "committee.size must be at least 1",
            ));
        }
        // Range checks on the derived params cover min_agreement and timeout
        issues.extend(self.to_params().validate());
        issues
    }
}
