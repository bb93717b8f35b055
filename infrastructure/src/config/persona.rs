//! Persona documents
//!
//! ```toml
//! name = "Careful Shopper"
//! goals = ["Find running shoes", "Add them to the cart"]
//! tone = "casual"
//! noise_level = 0.2
//!
//! [traits]
//! adversarial = false
//! ```

use super::{LoadError, read_toml};
use probe_domain::{Persona, Tone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Raw persona document; missing fields fall back to a generic tester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonaFile {
    pub name: String,
    pub goals: Vec<String>,
    pub tone: Tone,
    pub noise_level: f64,
    pub traits: BTreeMap<String, Value>,
}

impl Default for PersonaFile {
    fn default() -> Self {
        Self {
            name: "Synthetic Tester".to_string(),
            goals: vec!["Explore functionality".to_string()],
            tone: Tone::Neutral,
            noise_level: 0.0,
            traits: BTreeMap::new(),
        }
    }
}

impl PersonaFile {
    pub fn into_persona(self) -> Result<Persona, probe_domain::DomainError> {
        let mut persona = Persona::new(self.name, self.goals)
            .with_tone(self.tone)
            .with_noise_level(self.noise_level)?;
        persona.traits = self.traits;
        Ok(persona)
    }
}

pub struct PersonaLoader;

impl PersonaLoader {
    pub fn load(path: &Path) -> Result<Persona, LoadError> {
        let file: PersonaFile = read_toml(path)?;
        file.into_persona().map_err(|e| LoadError::Invalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// The persona used when none is given
    pub fn default_persona() -> Persona {
        Persona::new(
            "Synthetic Tester",
            vec!["Explore functionality".to_string()],
        )
    }
}
