//! Validation configuration from TOML (`[validation]` section)
//!
//! ```toml
//! [validation]
//! safety_profile = "balanced"  # strict | balanced | neutral | auto
//! goal_policy = "advisory"     # advisory | blocking
//! ```
//!
//! `auto` picks `strict` for personas with an `adversarial` or
//! `safety_test` trait and `balanced` for everyone else.

use probe_application::SafetySelection;
use probe_domain::GoalPolicy;
use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileValidationConfig {
    pub safety_profile: String,
    pub goal_policy: String,
}

impl Default for FileValidationConfig {
    fn default() -> Self {
        Self {
            safety_profile: "balanced".to_string(),
            goal_policy: "advisory".to_string(),
        }
    }
}

impl FileValidationConfig {
    /// Parse `safety_profile`. Unknown values are errors, not warnings.
    pub fn parse_safety_profile(&self) -> (SafetySelection, Vec<ConfigIssue>) {
        match self.safety_profile.parse::<SafetySelection>() {
            Ok(selection) => (selection, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "validation.safety_profile".to_string(),
                        value: self.safety_profile.clone(),
                        valid_values: ["strict", "balanced", "neutral", "auto"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    format!(
                        "validation.safety_profile: unknown value '{}'",
                        self.safety_profile
                    ),
                );
                (SafetySelection::default(), vec![issue])
            }
        }
    }

    /// Parse `goal_policy`, falling back to advisory
    pub fn parse_goal_policy(&self) -> (GoalPolicy, Vec<ConfigIssue>) {
        match self.goal_policy.parse::<GoalPolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "validation.goal_policy".to_string(),
                        value: self.goal_policy.clone(),
                        valid_values: vec!["advisory".to_string(), "blocking".to_string()],
                    },
                    format!(
                        "validation.goal_policy: unknown value '{}', falling back to 'advisory'",
                        self.goal_policy
                    ),
                );
                (GoalPolicy::default(), vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_safety_profile().1;
        issues.extend(self.parse_goal_policy().1);
        issues
    }
}
