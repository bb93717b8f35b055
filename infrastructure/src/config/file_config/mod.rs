//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is `#[serde(default)]`, so an empty file is a valid config.
//! Enum-like fields stay strings here and are parsed with `parse_*` methods
//! that return the value together with any [`ConfigIssue`]s.

mod committee;
mod executor;
mod logging;
mod session;
mod sources;
mod validation;

pub use committee::FileCommitteeConfig;
pub use executor::{ExecutorKind, FileExecutorConfig};
pub use logging::FileLoggingConfig;
pub use session::FileSessionConfig;
pub use sources::{FileScriptStep, FileSourceConfig, SourceKind};
pub use validation::FileValidationConfig;

use probe_application::SessionConfig;
use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Committee size, consensus policy and timing
    pub committee: FileCommitteeConfig,
    /// Turn limit and low-agreement handling
    pub session: FileSessionConfig,
    /// Safety profile and goal policy
    pub validation: FileValidationConfig,
    /// How actions reach the system under test
    pub executor: FileExecutorConfig,
    /// Proposal source definitions, cycled to fill the committee
    pub sources: Vec<FileSourceConfig>,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.committee.validate());
        issues.extend(self.session.validate());
        issues.extend(self.validation.validate());
        issues.extend(self.executor.validate());

        if self.sources.is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyCommittee,
                "no [[sources]] defined: the committee has no members",
            ));
        }
        for (index, source) in self.sources.iter().enumerate() {
            issues.extend(source.validate(index));
        }
        if self.sources.len() > self.committee.size && self.committee.size > 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "sources".to_string(),
                },
                format!(
                    "{} sources defined but committee.size = {}; the extra sources are unused",
                    self.sources.len(),
                    self.committee.size
                ),
            ));
        }

        issues
    }

    /// Convert to the session config consumed by the application layer.
    ///
    /// Parse issues are dropped here; call [`validate`](Self::validate) first.
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig::default()
            .with_committee(self.committee.to_params())
            .with_max_turns(self.session.max_turns)
            .with_low_agreement(self.session.parse_low_agreement().0)
            .with_safety(self.validation.parse_safety_profile().0)
            .with_goal_policy(self.validation.parse_goal_policy().0)
    }
}
