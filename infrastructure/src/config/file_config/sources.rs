//! Proposal source definitions from TOML (`[[sources]]` array)
//!
//! ```toml
//! [[sources]]
//! kind = "command"
//! id = "local-llm"
//! program = "python3"
//! args = ["agents/propose.py", "--model", "llama3"]
//!
//! [[sources]]
//! kind = "scripted"
//! id = "cautious"
//! discussion = "follow"          # or "hold"
//!
//! [[sources.script]]
//! type = "type"
//! target = "#search"
//! payload = { text = "running shoes" }
//! confidence = 0.7
//! rationale = "Search is the quickest route to the goal"
//! ```
//!
//! When fewer definitions than `committee.size` are given, they are cycled.

use probe_domain::core::issue::{ConfigIssue, ConfigIssueCode};
use probe_domain::{Action, ProposalDraft};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Scripted,
    Command,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scripted" | "mock" => Ok(SourceKind::Scripted),
            "command" => Ok(SourceKind::Command),
            other => Err(format!("Unknown source kind: {}", other)),
        }
    }
}

/// One scripted proposal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileScriptStep {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
    /// Simulated thinking time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

fn default_confidence() -> f64 {
    probe_domain::committee::DEFAULT_CONFIDENCE
}

impl FileScriptStep {
    /// Build the draft as written; confidence is checked by the committee
    pub fn to_draft(&self) -> ProposalDraft {
        ProposalDraft {
            action: Action {
                action_type: self.action_type.as_str().into(),
                target: self.target.clone(),
                payload: self.payload.clone(),
            },
            confidence: self.confidence,
            rationale: self.rationale.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    pub kind: String,
    /// Defaults to `<kind>-<position>`
    pub id: Option<String>,
    /// Program to spawn (command)
    pub program: Option<String>,
    pub args: Vec<String>,
    /// Proposals in turn order (scripted)
    pub script: Vec<FileScriptStep>,
    /// Round-2 behaviour of a scripted source: "hold" or "follow"
    pub discussion: String,
}

impl Default for FileSourceConfig {
    fn default() -> Self {
        Self {
            kind: "scripted".to_string(),
            id: None,
            program: None,
            args: Vec::new(),
            script: Vec::new(),
            discussion: "hold".to_string(),
        }
    }
}

impl FileSourceConfig {
    pub fn id_or_default(&self, position: usize) -> String {
        self.id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", self.kind.to_lowercase(), position))
    }

    /// Whether a scripted source switches to the peer majority in Round 2
    pub fn follows_majority(&self) -> bool {
        self.discussion.eq_ignore_ascii_case("follow")
    }

    pub fn validate(&self, index: usize) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        match self.kind.parse::<SourceKind>() {
            Ok(SourceKind::Command) if self.program.as_deref().is_none_or(str::is_empty) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::IncompleteSource {
                        index,
                        field: "program".to_string(),
                    },
                    format!("sources[{}]: command sources need a program", index),
                ));
            }
            Ok(SourceKind::Scripted) if self.script.is_empty() => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::IncompleteSource {
                        index,
                        field: "script".to_string(),
                    },
                    format!(
                        "sources[{}]: scripted source has no script and will always abstain",
                        index
                    ),
                ));
            }
            Ok(_) => {}
            Err(_) => issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidEnumValue {
                    field: format!("sources[{}].kind", index),
                    value: self.kind.clone(),
                    valid_values: vec!["scripted".to_string(), "command".to_string()],
                },
                format!("sources[{}].kind: unknown value '{}'", index, self.kind),
            )),
        }
        if !["hold", "follow"].contains(&self.discussion.to_lowercase().as_str()) {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::InvalidEnumValue {
                    field: format!("sources[{}].discussion", index),
                    value: self.discussion.clone(),
                    valid_values: vec!["hold".to_string(), "follow".to_string()],
                },
                format!(
                    "sources[{}].discussion: unknown value '{}', falling back to 'hold'",
                    index, self.discussion
                ),
            ));
        }
        issues
    }
}
