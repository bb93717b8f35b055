//! Actions: one decided unit of interaction with the system under test.
//!
//! An [`Action`] is a value. It is built once by a proposal source, voted on,
//! validated and (maybe) executed, but never mutated along the way.
//!
//! The type of an action is kept verbatim even when it falls outside the
//! supported enumeration ([`ActionType::Unknown`]); deciding that such an
//! action is invalid is the schema check's job, not the parser's.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind of interaction an action performs
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    Navigate,
    Tap,
    Click,
    Type,
    Fill,
    Scroll,
    Upload,
    /// The agent reports an issue or signals that it is done
    Report,
    /// Anything outside the enumeration, kept as received
    Unknown(String),
}

impl ActionType {
    /// Every supported action type, in declaration order
    pub const SUPPORTED: [ActionType; 8] = [
        ActionType::Navigate,
        ActionType::Tap,
        ActionType::Click,
        ActionType::Type,
        ActionType::Fill,
        ActionType::Scroll,
        ActionType::Upload,
        ActionType::Report,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ActionType::Navigate => "navigate",
            ActionType::Tap => "tap",
            ActionType::Click => "click",
            ActionType::Type => "type",
            ActionType::Fill => "fill",
            ActionType::Scroll => "scroll",
            ActionType::Upload => "upload",
            ActionType::Report => "report",
            ActionType::Unknown(raw) => raw,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ActionType::Unknown(_))
    }

    /// Whether this type interacts with a page element or path
    pub fn is_interaction(&self) -> bool {
        matches!(
            self,
            ActionType::Navigate
                | ActionType::Tap
                | ActionType::Click
                | ActionType::Type
                | ActionType::Fill
        )
    }
}

impl From<String> for ActionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "navigate" => ActionType::Navigate,
            "tap" => ActionType::Tap,
            "click" => ActionType::Click,
            "type" => ActionType::Type,
            "fill" => ActionType::Fill,
            "scroll" => ActionType::Scroll,
            "upload" => ActionType::Upload,
            "report" => ActionType::Report,
            _ => ActionType::Unknown(raw),
        }
    }
}

impl From<&str> for ActionType {
    fn from(raw: &str) -> Self {
        ActionType::from(raw.to_string())
    }
}

impl From<ActionType> for String {
    fn from(kind: ActionType) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Voting identity of an action: two actions with the same key are the same vote
pub type ActionKey = (ActionType, String);

/// One decided unit of interaction
///
/// # Example
///
/// ```
/// use probe_domain::{Action, ActionType};
///
/// let action = Action::new(ActionType::Type, "#email").with_payload("text", "a@example.com");
/// assert_eq!(action.payload_str("text"), Some("a@example.com"));
/// assert!(action.same_vote(&Action::new("type", "#email")));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Map<String, Value>>,
}

impl Action {
    pub fn new(action_type: impl Into<ActionType>, target: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            target: target.into(),
            payload: None,
        }
    }

    /// Shorthand for a `report` action carrying an `issue` payload
    pub fn report(target: impl Into<String>, issue: impl Into<String>) -> Self {
        Self::new(ActionType::Report, target).with_payload("issue", issue.into())
    }

    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn payload_value(&self, key: &str) -> Option<&Value> {
        self.payload.as_ref().and_then(|p| p.get(key))
    }

    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload_value(key).and_then(Value::as_str)
    }

    pub fn key(&self) -> ActionKey {
        (self.action_type.clone(), self.target.clone())
    }

    /// Voting equality: same type and same target, payload ignored
    pub fn same_vote(&self, other: &Action) -> bool {
        self.action_type == other.action_type && self.target == other.target
    }

    pub fn is_report(&self) -> bool {
        self.action_type == ActionType::Report
    }

    /// Every string leaf of the payload, at any depth of objects and arrays
    pub fn payload_strings(&self) -> Vec<&str> {
        let mut strings = Vec::new();
        if let Some(payload) = &self.payload {
            for value in payload.values() {
                collect_strings(value, &mut strings);
            }
        }
        strings
    }

    /// Flattened payload rendered as `key: value` pairs, for pattern scans
    /// that need the key next to its value (e.g. `price: -1`).
    pub fn payload_text(&self) -> String {
        let Some(payload) = &self.payload else {
            return String::new();
        };
        let mut out = Vec::new();
        flatten_pairs(payload, &mut out);
        out.join(" ")
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.action_type, self.target)
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

fn flatten_pairs(map: &Map<String, Value>, out: &mut Vec<String>) {
    for (key, value) in map {
        match value {
            Value::Object(nested) => flatten_pairs(nested, out),
            Value::String(s) => out.push(format!("{}: {}", key, s)),
            other => out.push(format!("{}: {}", key, other)),
        }
    }
}
