//! Executor port
//!
//! Applies actions to the system under test. Retry policy, if any, belongs
//! to the implementation; the session treats every error as final.

use async_trait::async_trait;
use probe_domain::{Action, Execution};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutorError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout")]
    Timeout,

    #[error("Action rejected: {0}")]
    Rejected(String),

    #[error("Other error: {0}")]
    Other(String),
}

#[async_trait]
pub trait Executor: Send + Sync {
    /// Observation of the system before any action is taken
    async fn initial_observation(&self) -> Result<String, ExecutorError>;

    /// Apply `action` and describe what the system looks like afterwards
    async fn execute(&self, action: &Action) -> Result<Execution, ExecutorError>;
}
