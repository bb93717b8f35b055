//! The check capability every validator implements.

use crate::action::Action;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Result of evaluating one check against one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Passed, with a finding worth recording
    Advisory(String),
    Fail(String),
}

impl Verdict {
    pub fn is_fail(&self) -> bool {
        matches!(self, Verdict::Fail(_))
    }
}

/// Whether a failing check stops the pipeline and blocks execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckSeverity {
    Hard,
    Soft,
}

/// One stage of the validation pipeline.
///
/// Implementations must be pure: the same action and persona always yield
/// the same verdict, and evaluating never changes the check.
pub trait ActionCheck: Send + Sync {
    /// Stable name used in outcomes and logs
    fn name(&self) -> &'static str;

    fn severity(&self) -> CheckSeverity;

    fn evaluate(&self, action: &Action, persona: &Persona) -> Verdict;
}
