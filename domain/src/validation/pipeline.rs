//! Ordered validation pipeline and its outcome.

use super::check::{ActionCheck, CheckSeverity, Verdict};
use super::goal::{GoalAlignmentCheck, GoalPolicy};
use super::safety::{SafetyCheck, SafetyProfile};
use super::schema::SchemaCheck;
use crate::action::Action;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// What one check concluded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub check: String,
    pub passed: bool,
    pub severity: CheckSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The hard failure that blocked an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckFailure {
    pub check: String,
    pub reason: String,
}

impl std::fmt::Display for CheckFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} check failed: {}", self.check, self.reason)
    }
}

/// Result of running the pipeline on one action.
///
/// `results` holds every check that ran, in order. Checks after a hard
/// failure do not run and have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub results: Vec<CheckResult>,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<CheckFailure>,
    /// Soft checks that failed without blocking
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub soft_failures: Vec<CheckFailure>,
    /// Findings from checks that passed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

impl ValidationOutcome {
    /// Outcome for an action blocked before any check ran
    pub fn blocked(check: impl Into<String>, reason: impl Into<String>) -> Self {
        let check = check.into();
        let reason = reason.into();
        Self {
            results: vec![CheckResult {
                check: check.clone(),
                passed: false,
                severity: CheckSeverity::Hard,
                reason: Some(reason.clone()),
            }],
            passed: false,
            failure: Some(CheckFailure { check, reason }),
            soft_failures: Vec::new(),
            advisories: Vec::new(),
        }
    }

    /// Whether the named check passed; `None` if it did not run
    pub fn result(&self, check: &str) -> Option<bool> {
        self.results
            .iter()
            .find(|r| r.check == check)
            .map(|r| r.passed)
    }
}

/// Runs checks in registration order, stopping at the first hard failure.
///
/// # Example
///
/// ```
/// use probe_domain::{Action, ActionType, Persona};
/// use probe_domain::validation::{GoalPolicy, SafetyProfile, ValidationPipeline};
///
/// let pipeline = ValidationPipeline::standard(SafetyProfile::Strict, GoalPolicy::Advisory);
/// let persona = Persona::new("Shopper", vec!["Search for shoes".to_string()]);
///
/// let outcome = pipeline.run(&Action::new(ActionType::Navigate, "' OR 1=1--"), &persona);
/// assert!(!outcome.passed);
/// assert_eq!(outcome.failure.unwrap().check, "safety");
/// ```
pub struct ValidationPipeline {
    checks: Vec<Box<dyn ActionCheck>>,
}

impl ValidationPipeline {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Schema, then goal alignment, then safety
    pub fn standard(profile: SafetyProfile, goal_policy: GoalPolicy) -> Self {
        Self::new()
            .with_check(SchemaCheck)
            .with_check(GoalAlignmentCheck::new(goal_policy))
            .with_check(SafetyCheck::new(profile))
    }

    pub fn with_check(mut self, check: impl ActionCheck + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn check_names(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn run(&self, action: &Action, persona: &Persona) -> ValidationOutcome {
        let mut results = Vec::with_capacity(self.checks.len());
        let mut soft_failures = Vec::new();
        let mut advisories = Vec::new();

        for check in &self.checks {
            let severity = check.severity();
            match check.evaluate(action, persona) {
                Verdict::Pass => results.push(CheckResult {
                    check: check.name().to_string(),
                    passed: true,
                    severity,
                    reason: None,
                }),
                Verdict::Advisory(note) => {
                    advisories.push(format!("{}: {}", check.name(), note));
                    results.push(CheckResult {
                        check: check.name().to_string(),
                        passed: true,
                        severity,
                        reason: Some(note),
                    });
                }
                Verdict::Fail(reason) => {
                    results.push(CheckResult {
                        check: check.name().to_string(),
                        passed: false,
                        severity,
                        reason: Some(reason.clone()),
                    });
                    let failure = CheckFailure {
                        check: check.name().to_string(),
                        reason,
                    };
                    if severity == CheckSeverity::Hard {
                        return ValidationOutcome {
                            results,
                            passed: false,
                            failure: Some(failure),
                            soft_failures,
                            advisories,
                        };
                    }
                    soft_failures.push(failure);
                }
            }
        }

        ValidationOutcome {
            results,
            passed: true,
            failure: None,
            soft_failures,
            advisories,
        }
    }
}

impl Default for ValidationPipeline {
    fn default() -> Self {
        Self::standard(SafetyProfile::default(), GoalPolicy::default())
    }
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("checks", &self.check_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;
    use serde_json::json;

    fn shopper() -> Persona {
        Persona::new("Shopper", vec!["Search for running shoes".to_string()])
    }

    #[test]
    fn test_standard_order() {
        let pipeline = ValidationPipeline::default();
        assert_eq!(pipeline.check_names(), vec!["schema", "goal", "safety"]);
    }

    #[test]
    fn test_schema_failure_short_circuits() {
        let pipeline = ValidationPipeline::default();
        let outcome = pipeline.run(&Action::new("hover", "#menu"), &shopper());
        assert!(!outcome.passed);
        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.result("schema"), Some(false));
        assert_eq!(outcome.result("goal"), None);
        assert_eq!(outcome.result("safety"), None);
    }

    #[test]
    fn test_soft_goal_failure_continues() {
        let pipeline = ValidationPipeline::default();
        let outcome = pipeline.run(&Action::new(ActionType::Navigate, "/about"), &shopper());
        assert!(outcome.passed);
        assert_eq!(outcome.result("goal"), Some(false));
        assert_eq!(outcome.result("safety"), Some(true));
        assert_eq!(outcome.soft_failures.len(), 1);
        assert!(outcome.failure.is_none());
    }

    #[test]
    fn test_blocking_goal_policy_stops() {
        let pipeline = ValidationPipeline::standard(SafetyProfile::Balanced, GoalPolicy::Blocking);
        let outcome = pipeline.run(&Action::new(ActionType::Navigate, "/about"), &shopper());
        assert!(!outcome.passed);
        assert_eq!(outcome.failure.as_ref().map(|f| f.check.as_str()), Some("goal"));
        assert_eq!(outcome.result("safety"), None);
    }

    #[test]
    fn test_safety_advisory_recorded() {
        let pipeline = ValidationPipeline::standard(SafetyProfile::Neutral, GoalPolicy::Advisory);
        let action = Action::new(ActionType::Type, "#search").with_payload("text", "<script>shoes");
        let outcome = pipeline.run(&action, &shopper());
        assert!(outcome.passed);
        assert_eq!(outcome.advisories.len(), 1);
        assert!(outcome.advisories[0].starts_with("safety:"));
    }

    #[test]
    fn test_clean_action_passes_all() {
        let pipeline = ValidationPipeline::default();
        let action = Action::new(ActionType::Type, "#search").with_payload("text", "running shoes");
        let outcome = pipeline.run(&action, &shopper());
        assert!(outcome.passed);
        assert_eq!(outcome.results.iter().filter(|r| r.passed).count(), 3);
    }

    #[test]
    fn test_nested_injection_is_blocked() {
        let pipeline = ValidationPipeline::standard(SafetyProfile::Strict, GoalPolicy::Advisory);
        let action = Action::new(ActionType::Fill, "#search")
            .with_payload("form", json!({"fields": {"q": "' OR 1=1--"}}));
        let outcome = pipeline.run(&action, &shopper());
        assert!(!outcome.passed);
        assert_eq!(outcome.failure.as_ref().map(|f| f.check.as_str()), Some("safety"));
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = ValidationPipeline::standard(SafetyProfile::Balanced, GoalPolicy::Advisory);
        let persona = shopper();
        for action in [
            Action::new(ActionType::Type, "#search").with_payload("text", "running shoes"),
            Action::new(ActionType::Navigate, "/files/../../etc/passwd"),
            Action::new("hover", "#menu"),
        ] {
            assert_eq!(pipeline.run(&action, &persona), pipeline.run(&action, &persona));
        }
    }

    #[test]
    fn test_blocked_outcome() {
        let outcome = ValidationOutcome::blocked("agreement", "agreement 0.33 below 0.50");
        assert!(!outcome.passed);
        assert_eq!(outcome.result("agreement"), Some(false));
    }
}
