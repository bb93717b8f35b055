//! Schema check: is the action well-formed for its type?

use super::check::{ActionCheck, CheckSeverity, Verdict};
use crate::action::{Action, ActionType};
use crate::persona::Persona;

/// Payload keys an action type requires; any one of the alternatives suffices
fn required_payload(action_type: &ActionType) -> Option<&'static [&'static str]> {
    match action_type {
        ActionType::Type => Some(&["text"]),
        ActionType::Fill => Some(&["text", "value"]),
        ActionType::Upload => Some(&["file_path"]),
        _ => None,
    }
}

/// Rejects unknown types, empty targets, and payloads missing required keys
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCheck;

impl ActionCheck for SchemaCheck {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn severity(&self) -> CheckSeverity {
        CheckSeverity::Hard
    }

    fn evaluate(&self, action: &Action, _persona: &Persona) -> Verdict {
        if !action.action_type.is_supported() {
            return Verdict::Fail(format!(
                "type: '{}' is not one of {}",
                action.action_type,
                ActionType::SUPPORTED
                    .iter()
                    .map(ActionType::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        if action.target.trim().is_empty() && !action.is_report() {
            return Verdict::Fail(format!(
                "target: must not be empty for '{}' actions",
                action.action_type
            ));
        }

        if let Some(keys) = required_payload(&action.action_type) {
            let present = keys
                .iter()
                .any(|k| action.payload_value(k).is_some_and(|v| !v.is_null()));
            if !present {
                return Verdict::Fail(format!(
                    "payload.{}: required for '{}' actions",
                    keys.join("|payload."),
                    action.action_type
                ));
            }
        }

        Verdict::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> Persona {
        Persona::new("p", vec![])
    }

    #[test]
    fn test_unknown_type_fails_naming_type() {
        let verdict = SchemaCheck.evaluate(&Action::new("hover", "#menu"), &persona());
        let Verdict::Fail(reason) = verdict else {
            panic!("expected failure");
        };
        assert!(reason.starts_with("type:"));
        assert!(reason.contains("hover"));
    }

    #[test]
    fn test_empty_target() {
        let verdict = SchemaCheck.evaluate(&Action::new(ActionType::Click, "  "), &persona());
        assert!(matches!(verdict, Verdict::Fail(r) if r.starts_with("target:")));

        // report may have an empty target
        let report = Action::new(ActionType::Report, "");
        assert_eq!(SchemaCheck.evaluate(&report, &persona()), Verdict::Pass);
    }

    #[test]
    fn test_type_requires_text() {
        let missing = Action::new(ActionType::Type, "#q");
        assert!(matches!(
            SchemaCheck.evaluate(&missing, &persona()),
            Verdict::Fail(r) if r.starts_with("payload.text")
        ));

        let ok = Action::new(ActionType::Type, "#q").with_payload("text", "shoes");
        assert_eq!(SchemaCheck.evaluate(&ok, &persona()), Verdict::Pass);
    }

    #[test]
    fn test_fill_accepts_value_or_text() {
        let value = Action::new(ActionType::Fill, "#email").with_payload("value", "a@b.c");
        let text = Action::new(ActionType::Fill, "#email").with_payload("text", "a@b.c");
        let null = Action::new(ActionType::Fill, "#email").with_payload("value", serde_json::Value::Null);
        assert_eq!(SchemaCheck.evaluate(&value, &persona()), Verdict::Pass);
        assert_eq!(SchemaCheck.evaluate(&text, &persona()), Verdict::Pass);
        assert!(SchemaCheck.evaluate(&null, &persona()).is_fail());
    }

    #[test]
    fn test_upload_requires_file_path() {
        let missing = Action::new(ActionType::Upload, "#avatar");
        assert!(SchemaCheck.evaluate(&missing, &persona()).is_fail());
    }

    #[test]
    fn test_other_types_accept_any_payload() {
        let scroll = Action::new(ActionType::Scroll, "down").with_payload("pixels", 500);
        assert_eq!(SchemaCheck.evaluate(&scroll, &persona()), Verdict::Pass);
    }
}
