//! Session configuration from TOML (`[session]` section)
//!
//! ```toml
//! [session]
//! max_turns = 10
//! low_agreement = "advisory"   # or "block"
//! ```

use probe_application::LowAgreementPolicy;
use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    pub max_turns: u32,
    pub low_agreement: String,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            low_agreement: "advisory".to_string(),
        }
    }
}

impl FileSessionConfig {
    /// Parse `low_agreement`, falling back to advisory
    pub fn parse_low_agreement(&self) -> (LowAgreementPolicy, Vec<ConfigIssue>) {
        match self.low_agreement.parse::<LowAgreementPolicy>() {
            Ok(policy) => (policy, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "session.low_agreement".to_string(),
                        value: self.low_agreement.clone(),
                        valid_values: vec!["advisory".to_string(), "block".to_string()],
                    },
                    format!(
                        "session.low_agreement: unknown value '{}', falling back to 'advisory'",
                        self.low_agreement
                    ),
                );
                (LowAgreementPolicy::default(), vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.parse_low_agreement().1;
        if self.max_turns == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroMaxTurns,
                "session.max_turns must be at least 1",
            ));
        }
        issues
    }
}
