//! Scenario documents: where a session starts and how long it may run
//!
//! ```toml
//! name = "checkout"
//! description = "Buy a pair of shoes"
//! initial_observation = "Home page with a search box"
//! max_turns = 8
//! ```

use super::{LoadError, read_toml};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    pub description: String,
    /// Overrides the executor's initial observation
    pub initial_observation: Option<String>,
    /// Overrides `session.max_turns`
    pub max_turns: Option<u32>,
}

pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> Result<Scenario, LoadError> {
        read_toml(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_scenario() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name = \"checkout\"\ninitial_observation = \"Home\"\nmax_turns = 8"
        )
        .unwrap();
        let scenario = ScenarioLoader::load(file.path()).unwrap();
        assert_eq!(scenario.name, "checkout");
        assert_eq!(scenario.initial_observation.as_deref(), Some("Home"));
        assert_eq!(scenario.max_turns, Some(8));
    }
}
