//! Executor that answers every action with the next canned observation.

use async_trait::async_trait;
use probe_application::{Executor, ExecutorError};
use probe_domain::{Action, Execution};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

const DEFAULT_INITIAL: &str = "Initial page";

pub struct ScriptedExecutor {
    initial: String,
    observations: Vec<String>,
    next: AtomicUsize,
}

impl ScriptedExecutor {
    /// Without an explicit initial observation the first canned one is used.
    pub fn new(initial: Option<String>, observations: Vec<String>) -> Self {
        let initial = initial
            .or_else(|| observations.first().cloned())
            .unwrap_or_else(|| DEFAULT_INITIAL.to_string());
        Self {
            initial,
            observations,
            next: AtomicUsize::new(0),
        }
    }

    /// Number of non-report actions executed so far
    pub fn executed(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Executor for ScriptedExecutor {
    async fn initial_observation(&self) -> Result<String, ExecutorError> {
        Ok(self.initial.clone())
    }

    async fn execute(&self, action: &Action) -> Result<Execution, ExecutorError> {
        if action.is_report() {
            let issue = action.payload_str("issue").unwrap_or(&action.target);
            return Ok(Execution::new(format!("Report submitted: {}", issue), 0.0));
        }

        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let observation = if self.observations.is_empty() {
            format!("After {}", action)
        } else {
            self.observations[index % self.observations.len()].clone()
        };
        debug!(%action, %observation, "Scripted execution");
        Ok(Execution::new(observation, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_domain::ActionType;

    #[tokio::test]
    async fn test_cycles_observations() {
        let executor =
            ScriptedExecutor::new(None, vec!["Home".to_string(), "Results".to_string()]);
        assert_eq!(executor.initial_observation().await.unwrap(), "Home");

        let click = Action::new(ActionType::Click, "#go");
        let seen: Vec<String> = [
            executor.execute(&click).await.unwrap().observation,
            executor.execute(&click).await.unwrap().observation,
            executor.execute(&click).await.unwrap().observation,
        ]
        .into();
        assert_eq!(seen, vec!["Home", "Results", "Home"]);
        assert_eq!(executor.executed(), 3);
    }

    #[tokio::test]
    async fn test_report_is_answered_locally() {
        let executor = ScriptedExecutor::new(Some("Start".to_string()), vec![]);
        let result = executor
            .execute(&Action::report("task_complete", "all good"))
            .await
            .unwrap();
        assert_eq!(result.observation, "Report submitted: all good");
        assert_eq!(executor.executed(), 0);
    }

    #[tokio::test]
    async fn test_without_observations_describes_action() {
        let executor = ScriptedExecutor::new(None, vec![]);
        assert_eq!(executor.initial_observation().await.unwrap(), "Initial page");
        let result = executor
            .execute(&Action::new(ActionType::Navigate, "/cart"))
            .await
            .unwrap();
        assert_eq!(result.observation, "After navigate -> /cart");
    }
}
