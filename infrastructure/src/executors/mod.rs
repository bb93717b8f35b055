//! Executor adapters
//!
//! - [`ScriptedExecutor`]: canned observations, for dry runs and tests
//! - `RestExecutor` (feature `rest`): drives an HTTP system under test

mod scripted;

#[cfg(feature = "rest")]
mod rest;

#[cfg(feature = "rest")]
pub use rest::RestExecutor;
pub use scripted::ScriptedExecutor;

use crate::config::{ExecutorKind, FileExecutorConfig};
use probe_application::Executor;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildExecutorError {
    #[error("{0}")]
    InvalidKind(String),

    #[error("executor.base_url is required for the rest executor")]
    MissingBaseUrl,

    #[error("The rest executor requires the `rest` feature")]
    FeatureDisabled,

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

pub fn build_executor(config: &FileExecutorConfig) -> Result<Arc<dyn Executor>, BuildExecutorError> {
    let kind = config
        .kind
        .parse::<ExecutorKind>()
        .map_err(BuildExecutorError::InvalidKind)?;

    match kind {
        ExecutorKind::Scripted => Ok(Arc::new(ScriptedExecutor::new(
            config.initial_observation.clone(),
            config.observations.clone(),
        ))),
        ExecutorKind::Rest => build_rest(config),
    }
}

#[cfg(feature = "rest")]
fn build_rest(config: &FileExecutorConfig) -> Result<Arc<dyn Executor>, BuildExecutorError> {
    let base_url = config
        .base_url
        .clone()
        .ok_or(BuildExecutorError::MissingBaseUrl)?;
    let executor = RestExecutor::new(
        base_url,
        std::time::Duration::from_secs(config.timeout_secs),
    )
    .map_err(|e| BuildExecutorError::Client(e.to_string()))?;
    Ok(Arc::new(executor))
}

#[cfg(not(feature = "rest"))]
fn build_rest(_config: &FileExecutorConfig) -> Result<Arc<dyn Executor>, BuildExecutorError> {
    Err(BuildExecutorError::FeatureDisabled)
}
