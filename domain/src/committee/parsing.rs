//! Proposal parsing from free-form source output.
//!
//! Model-backed sources are asked for a bare JSON object like
//! `{"type": "click", "target": "#buy", "payload": null, "confidence": 0.8}`
//! but frequently wrap it in prose or code fences, or nest it in an
//! `action` / `action_input` key. [`parse_proposal_json`] undoes those known
//! shapes. It never invents an action: output without a recognisable type is
//! malformed, and an unsupported type is kept verbatim for the schema check.

use super::proposal::ProposalDraft;
use crate::action::{Action, ActionType};
use crate::core::error::DomainError;
use serde_json::{Map, Value};

/// Confidence assumed when a source does not state one
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

/// Parse a source's raw output into a [`ProposalDraft`].
///
/// # Examples
///
/// ```
/// use probe_domain::committee::parse_proposal_json;
/// use probe_domain::ActionType;
///
/// let draft = parse_proposal_json(
///     "Sure! ```json\n{\"action\": {\"type\": \"navigate\", \"target\": \"/cart\"}, \"confidence\": 0.7}\n```",
/// )
/// .unwrap();
/// assert_eq!(draft.action.action_type, ActionType::Navigate);
/// assert_eq!(draft.confidence, 0.7);
///
/// assert!(parse_proposal_json("I would click the button").is_err());
/// ```
pub fn parse_proposal_json(text: &str) -> Result<ProposalDraft, DomainError> {
    let value = extract_json_object(text)
        .ok_or_else(|| DomainError::MalformedProposal("no JSON object found".to_string()))?;
    let Value::Object(data) = value else {
        return Err(DomainError::MalformedProposal(
            "expected a JSON object".to_string(),
        ));
    };
    parse_proposal_value(data)
}

/// Parse an already-decoded JSON object into a [`ProposalDraft`].
pub fn parse_proposal_value(mut data: Map<String, Value>) -> Result<ProposalDraft, DomainError> {
    let confidence = match data.remove("confidence") {
        None | Some(Value::Null) => DEFAULT_CONFIDENCE,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(other) => {
            return Err(DomainError::MalformedProposal(format!(
                "confidence is not a number: {}",
                other
            )));
        }
    };
    let rationale = data
        .remove("rationale")
        .or_else(|| data.remove("reasoning"))
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    let mut fields = normalize_action_fields(data);

    let action_type = match fields.remove("type") {
        Some(Value::String(t)) if !t.trim().is_empty() => ActionType::from(t.trim().to_string()),
        Some(other) if !other.is_null() && !other.is_string() => {
            return Err(DomainError::MalformedProposal(format!(
                "action type is not a string: {}",
                other
            )));
        }
        _ => {
            return Err(DomainError::MalformedProposal(
                "missing action type".to_string(),
            ));
        }
    };
    let target = match fields.remove("target") {
        Some(Value::String(t)) => t,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    };
    let payload = match fields.remove("payload") {
        None | Some(Value::Null) => None,
        Some(Value::Object(map)) => Some(map),
        Some(other) => {
            return Err(DomainError::MalformedProposal(format!(
                "payload is not an object: {}",
                other
            )));
        }
    };

    let action = Action {
        action_type,
        target,
        payload,
    };
    ProposalDraft::new(action, confidence, rationale)
}

/// Flatten the wrapper shapes models produce into plain `type`/`target`/`payload` keys
fn normalize_action_fields(mut data: Map<String, Value>) -> Map<String, Value> {
    match data.remove("action") {
        Some(Value::Object(inner)) => {
            // Wrapped: the inner object is the action itself
            for (key, value) in inner {
                data.insert(key, value);
            }
        }
        Some(Value::String(kind)) => {
            data.entry("type").or_insert(Value::String(kind));
        }
        Some(other) => {
            data.insert("action".to_string(), other);
        }
        None => {}
    }

    if let Some(kind) = data.remove("action_type") {
        data.entry("type").or_insert(kind);
    }

    if let Some(Value::Object(input)) = data.remove("action_input") {
        if let Some(target) = input.get("target") {
            data.insert("target".to_string(), target.clone());
        }
        for (key, value) in input {
            data.entry(key).or_insert(value);
        }
    }

    data.remove("method");
    data
}

/// Locate a JSON object in `text`: the whole text, a fenced block, or the
/// outermost `{ ... }` span.
fn extract_json_object(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```")
            && let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(body[..end].trim())
        {
            return Some(value);
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&trimmed[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}
