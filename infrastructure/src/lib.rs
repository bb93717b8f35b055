//! Infrastructure layer for persona-probe
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration, persona and scenario
//! file loading.

pub mod config;
pub mod executors;
pub mod logging;
pub mod sources;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, LoadError, PersonaLoader, Scenario, ScenarioLoader,
};
pub use executors::{BuildExecutorError, ScriptedExecutor, build_executor};
#[cfg(feature = "rest")]
pub use executors::RestExecutor;
pub use logging::JsonlTurnLogger;
pub use sources::{
    BuildSourcesError, CommandProposalSource, ScriptedProposalSource, build_sources,
};
