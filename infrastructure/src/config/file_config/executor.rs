//! Executor configuration from TOML (`[executor]` section)
//!
//! ```toml
//! [executor]
//! kind = "scripted"                  # or "rest"
//! initial_observation = "Home page"  # scripted only
//! observations = ["Search results", "Product page"]
//!
//! # kind = "rest"
//! # base_url = "http://localhost:8080"
//! # timeout_secs = 10
//! ```

use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorKind {
    Scripted,
    Rest,
}

impl std::str::FromStr for ExecutorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scripted" | "mock" => Ok(ExecutorKind::Scripted),
            "rest" | "http" => Ok(ExecutorKind::Rest),
            other => Err(format!("Unknown executor kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    pub kind: String,
    /// Base URL of the system under test (rest)
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    /// Observation before the first action (scripted)
    pub initial_observation: Option<String>,
    /// Observations returned in turn, cycling (scripted)
    pub observations: Vec<String>,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            kind: "scripted".to_string(),
            base_url: None,
            timeout_secs: 30,
            initial_observation: None,
            observations: Vec::new(),
        }
    }
}

impl FileExecutorConfig {
    pub fn parse_kind(&self) -> (Option<ExecutorKind>, Vec<ConfigIssue>) {
        match self.kind.parse::<ExecutorKind>() {
            Ok(kind) => (Some(kind), vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "executor.kind".to_string(),
                        value: self.kind.clone(),
                        valid_values: vec!["scripted".to_string(), "rest".to_string()],
                    },
                    format!("executor.kind: unknown value '{}'", self.kind),
                );
                (None, vec![issue])
            }
        }
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        let (kind, mut issues) = self.parse_kind();
        if kind == Some(ExecutorKind::Rest) && self.base_url.is_none() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::MissingField {
                    field: "executor.base_url".to_string(),
                },
                "executor.base_url is required when executor.kind = \"rest\"",
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "executor.timeout_secs".to_string(),
                },
                "executor.timeout_secs must be greater than zero",
            ));
        }
        issues
    }
}
