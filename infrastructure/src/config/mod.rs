//! Configuration file loading for persona-probe
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PROBE_*` environment variables (`PROBE_COMMITTEE__SEED=7`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./probe.toml` or `./.probe.toml`
//! 4. Global: `$XDG_CONFIG_HOME/persona-probe/config.toml`
//! 5. Default values
//!
//! Persona and scenario files are separate TOML documents loaded by
//! [`PersonaLoader`] and [`ScenarioLoader`].

mod file_config;
mod loader;
mod persona;
mod scenario;

pub use file_config::{
    ExecutorKind, FileCommitteeConfig, FileConfig, FileExecutorConfig, FileLoggingConfig,
    FileScriptStep, FileSessionConfig, FileSourceConfig, FileValidationConfig, SourceKind,
};
pub use loader::ConfigLoader;
pub use persona::{PersonaFile, PersonaLoader};
pub use scenario::{Scenario, ScenarioLoader};

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading a persona or scenario document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid persona in {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

pub(crate) fn read_toml<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
