//! Session configuration: the single explicit value a session runs under.

use super::committee_params::CommitteeParams;
use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use probe_domain::{GoalPolicy, Persona, SafetyProfile};
use serde::{Deserialize, Serialize};

/// What a low-agreement consensus means for the turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowAgreementPolicy {
    /// Flagged in the record; the action still runs
    #[default]
    Advisory,
    /// Treated as a hard failure of the `agreement` check
    Block,
}

impl std::str::FromStr for LowAgreementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "advisory" => Ok(LowAgreementPolicy::Advisory),
            "block" | "blocking" => Ok(LowAgreementPolicy::Block),
            other => Err(format!(
                "Unknown low-agreement policy: {}. Valid: advisory, block",
                other
            )),
        }
    }
}

/// Safety profile selection: fixed, or derived from the persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafetySelection {
    Fixed(SafetyProfile),
    /// `strict` for adversarial personas, `balanced` otherwise
    Auto,
}

impl Default for SafetySelection {
    fn default() -> Self {
        SafetySelection::Fixed(SafetyProfile::Balanced)
    }
}

impl SafetySelection {
    pub fn resolve(&self, persona: &Persona) -> SafetyProfile {
        match self {
            SafetySelection::Fixed(profile) => *profile,
            SafetySelection::Auto => SafetyProfile::for_persona(persona),
        }
    }
}

impl std::str::FromStr for SafetySelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("auto") {
            return Ok(SafetySelection::Auto);
        }
        s.parse::<SafetyProfile>()
            .map(SafetySelection::Fixed)
            .map_err(|_| {
                format!(
                    "Unknown safety profile: {}. Valid: strict, balanced, neutral, auto",
                    s
                )
            })
    }
}

/// Everything [`RunSessionUseCase`](crate::use_cases::run_session::RunSessionUseCase)
/// needs to know, passed in explicitly at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub committee: CommitteeParams,
    pub max_turns: u32,
    pub low_agreement: LowAgreementPolicy,
    pub safety: SafetySelection,
    pub goal_policy: GoalPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            committee: CommitteeParams::default(),
            max_turns: 10,
            low_agreement: LowAgreementPolicy::default(),
            safety: SafetySelection::default(),
            goal_policy: GoalPolicy::default(),
        }
    }
}

impl SessionConfig {
    // ==================== Builder Methods ====================

    pub fn with_committee(mut self, committee: CommitteeParams) -> Self {
        self.committee = committee;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_low_agreement(mut self, policy: LowAgreementPolicy) -> Self {
        self.low_agreement = policy;
        self
    }

    pub fn with_safety(mut self, safety: SafetySelection) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_goal_policy(mut self, policy: GoalPolicy) -> Self {
        self.goal_policy = policy;
        self
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.committee.validate();
        if self.max_turns == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxTurns,
                "max_turns must be at least 1",
            ));
        }
        issues
    }
}
