//! Voting policy for the committee's consensus round.

use serde::{Deserialize, Serialize};

/// How Round-3 groups are scored and when a result counts as low-confidence
///
/// # Example
///
/// ```
/// use probe_domain::ConsensusPolicy;
///
/// let policy = ConsensusPolicy::default().with_min_agreement(0.75);
/// assert!(policy.is_low_agreement(2.0 / 3.0));
/// assert!(!policy.is_low_agreement(0.8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusPolicy {
    /// Minimum agreement fraction below which a result is flagged low-confidence
    pub min_agreement: f64,
    /// Score groups by summed confidence (true) or by member count (false)
    pub confidence_weighting: bool,
}

impl Default for ConsensusPolicy {
    fn default() -> Self {
        Self {
            min_agreement: 0.5,
            confidence_weighting: true,
        }
    }
}

impl ConsensusPolicy {
    pub fn with_min_agreement(mut self, min_agreement: f64) -> Self {
        self.min_agreement = min_agreement;
        self
    }

    pub fn with_confidence_weighting(mut self, enabled: bool) -> Self {
        self.confidence_weighting = enabled;
        self
    }

    pub fn is_low_agreement(&self, agreement: f64) -> bool {
        agreement < self.min_agreement
    }

    pub fn description(&self) -> String {
        format!(
            "{} vote, min agreement {:.0}%",
            if self.confidence_weighting {
                "confidence-weighted"
            } else {
                "unweighted"
            },
            self.min_agreement * 100.0
        )
    }
}
