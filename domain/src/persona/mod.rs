//! Persona: the simulated user a session tests on behalf of.
//!
//! A persona is loaded once per session and then only ever read. Every
//! proposal source in a committee sees the same `Arc<Persona>`.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Conversational register of the simulated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Casual,
    Formal,
    Impatient,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Casual => "casual",
            Tone::Formal => "formal",
            Tone::Impatient => "impatient",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Tone::Neutral),
            "casual" => Ok(Tone::Casual),
            "formal" => Ok(Tone::Formal),
            "impatient" => Ok(Tone::Impatient),
            other => Err(format!(
                "Unknown tone: {}. Valid: neutral, casual, formal, impatient",
                other
            )),
        }
    }
}

/// Identity and intent of a simulated user
///
/// # Example
///
/// ```
/// use probe_domain::Persona;
///
/// let persona = Persona::new("Careful Shopper", vec!["Add a product to the cart".into()])
///     .with_trait("adversarial", true);
/// assert!(persona.is_adversarial());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    /// Ordered goal statements; earlier goals matter more to the author
    pub goals: Vec<String>,
    #[serde(default)]
    pub tone: Tone,
    /// How far the agent should stray from optimal behaviour, in [0, 1]
    #[serde(default)]
    noise_level: f64,
    #[serde(default)]
    pub traits: BTreeMap<String, Value>,
}

impl Persona {
    pub fn new(name: impl Into<String>, goals: Vec<String>) -> Self {
        Self {
            name: name.into(),
            goals,
            tone: Tone::default(),
            noise_level: 0.0,
            traits: BTreeMap::new(),
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Set the noise level, rejecting values outside [0, 1]
    pub fn with_noise_level(mut self, noise_level: f64) -> Result<Self, DomainError> {
        if !(0.0..=1.0).contains(&noise_level) {
            return Err(DomainError::InvalidNoiseLevel(noise_level));
        }
        self.noise_level = noise_level;
        Ok(self)
    }

    pub fn with_trait(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.traits.insert(key.into(), value.into());
        self
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    /// Whether a trait is present and truthy (`true`, non-zero, non-empty string).
    pub fn has_trait(&self, key: &str) -> bool {
        match self.traits.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            Some(Value::String(s)) => !s.is_empty() && s != "false",
            Some(Value::Null) | None => false,
            Some(_) => true,
        }
    }

    /// Personas marked `adversarial` or `safety_test` deliberately attempt abuse.
    pub fn is_adversarial(&self) -> bool {
        self.has_trait("adversarial") || self.has_trait("safety_test")
    }
}
