//! Goal-alignment check: does any persona goal plausibly motivate the action?
//!
//! This is keyword matching, not understanding. A failure means no goal
//! statement shares vocabulary with the action, which is a hint that the
//! agent is wandering rather than proof that it is.

use super::check::{ActionCheck, CheckSeverity, Verdict};
use crate::action::Action;
use crate::core::string::keywords;
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Minimum word length considered meaningful when matching
const MIN_KEYWORD_LEN: usize = 4;

const STOPWORDS: &[&str] = &[
    "that", "this", "with", "from", "into", "then", "them", "they", "their", "there", "have",
    "make", "sure", "will", "should", "able", "page", "some", "every", "each", "also", "over",
];

const SIGNUP_HINTS: &[&str] = &["signup", "sign-up", "email", "account", "register"];

/// Whether goal misalignment blocks execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPolicy {
    /// Recorded as a soft failure; execution continues
    #[default]
    Advisory,
    /// Treated like any other hard failure
    Blocking,
}

impl std::str::FromStr for GoalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "advisory" | "soft" => Ok(GoalPolicy::Advisory),
            "blocking" | "hard" | "block" => Ok(GoalPolicy::Blocking),
            other => Err(format!(
                "Unknown goal policy: {}. Valid: advisory, blocking",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoalAlignmentCheck {
    policy: GoalPolicy,
}

impl GoalAlignmentCheck {
    pub fn new(policy: GoalPolicy) -> Self {
        Self { policy }
    }

    fn wants_signup(persona: &Persona) -> bool {
        persona.goals.iter().any(|g| {
            let g = g.to_lowercase();
            g.contains("create account") || g.contains("sign")
        })
    }
}

impl ActionCheck for GoalAlignmentCheck {
    fn name(&self) -> &'static str {
        "goal"
    }

    fn severity(&self) -> CheckSeverity {
        match self.policy {
            GoalPolicy::Advisory => CheckSeverity::Soft,
            GoalPolicy::Blocking => CheckSeverity::Hard,
        }
    }

    fn evaluate(&self, action: &Action, persona: &Persona) -> Verdict {
        // Reporting is always in scope: it is how an agent says it is done
        if action.is_report() || persona.goals.is_empty() {
            return Verdict::Pass;
        }

        let target = action.target.to_lowercase();
        if Self::wants_signup(persona) && action.action_type.is_interaction() {
            return if SIGNUP_HINTS.iter().any(|h| target.contains(h)) {
                Verdict::Pass
            } else {
                Verdict::Fail(format!(
                    "sign-up goal does not motivate {} (expected a signup/email/account/register target)",
                    action
                ))
            };
        }

        let mut haystack = format!("{} {}", action.action_type, target);
        for field in action.payload_strings() {
            haystack.push(' ');
            haystack.push_str(&field.to_lowercase());
        }
        let goal_text = persona.goals.join(" ").to_lowercase();

        let goal_words: Vec<String> = keywords(&goal_text, MIN_KEYWORD_LEN)
            .into_iter()
            .filter(|w| !STOPWORDS.contains(&w.as_str()))
            .collect();
        if goal_words.iter().any(|w| haystack.contains(w.as_str())) {
            return Verdict::Pass;
        }

        let action_words = keywords(&haystack, MIN_KEYWORD_LEN);
        if action_words
            .iter()
            .filter(|w| !STOPWORDS.contains(&w.as_str()))
            .any(|w| goal_text.contains(w.as_str()))
        {
            return Verdict::Pass;
        }

        Verdict::Fail(format!("no goal statement plausibly motivates {}", action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionType;

    fn shopper() -> Persona {
        Persona::new(
            "Shopper",
            vec![
                "Find a pair of running shoes".to_string(),
                "Add them to the cart".to_string(),
            ],
        )
    }

    #[test]
    fn test_keyword_match_passes() {
        let check = GoalAlignmentCheck::default();
        let action = Action::new(ActionType::Click, "#add-to-cart");
        assert_eq!(check.evaluate(&action, &shopper()), Verdict::Pass);

        let search = Action::new(ActionType::Type, "#search").with_payload("text", "running shoes");
        assert_eq!(check.evaluate(&search, &shopper()), Verdict::Pass);
    }

    #[test]
    fn test_unrelated_action_fails() {
        let check = GoalAlignmentCheck::default();
        let action = Action::new(ActionType::Navigate, "/admin/settings");
        assert!(check.evaluate(&action, &shopper()).is_fail());
    }

    #[test]
    fn test_report_and_goalless_persona_pass() {
        let check = GoalAlignmentCheck::default();
        assert_eq!(
            check.evaluate(&Action::report("task_complete", "done"), &shopper()),
            Verdict::Pass
        );
        let aimless = Persona::new("Wanderer", vec![]);
        assert_eq!(
            check.evaluate(&Action::new(ActionType::Click, "#x"), &aimless),
            Verdict::Pass
        );
    }

    #[test]
    fn test_signup_rule() {
        let check = GoalAlignmentCheck::default();
        let persona = Persona::new("New user", vec!["Create account and sign in".to_string()]);

        let register = Action::new(ActionType::Click, "#register-button");
        assert_eq!(check.evaluate(&register, &persona), Verdict::Pass);

        let browse = Action::new(ActionType::Click, "#product-42");
        assert!(check.evaluate(&browse, &persona).is_fail());

        // Non-interaction types are not constrained by the sign-up rule
        let scroll = Action::new(ActionType::Scroll, "down");
        assert!(!matches!(
            check.evaluate(&scroll, &persona),
            Verdict::Fail(r) if r.starts_with("sign-up")
        ));
    }

    #[test]
    fn test_policy_controls_severity() {
        assert_eq!(GoalAlignmentCheck::default().severity(), CheckSeverity::Soft);
        assert_eq!(
            GoalAlignmentCheck::new(GoalPolicy::Blocking).severity(),
            CheckSeverity::Hard
        );
        assert_eq!("hard".parse::<GoalPolicy>().ok(), Some(GoalPolicy::Blocking));
        assert!("maybe".parse::<GoalPolicy>().is_err());
    }
}
