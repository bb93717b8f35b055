//! HTTP executor for REST-style systems under test
//!
//! - `navigate` and `scroll` issue `GET <target>`
//! - `tap`, `click`, `type`, `fill` and `upload` issue `POST <target>` with
//!   the payload as the JSON body
//! - `report` is answered locally and never leaves the process
//!
//! Relative targets are joined to `base_url`.
//!
//! The observation is the status line followed by a preview of the body.

use async_trait::async_trait;
use probe_application::{Executor, ExecutorError};
use probe_domain::core::string::truncate;
use probe_domain::{Action, ActionType, Execution};
use std::time::{Duration, Instant};
use tracing::debug;

const BODY_PREVIEW_BYTES: usize = 500;

pub struct RestExecutor {
    base_url: String,
    client: reqwest::Client,
}

impl RestExecutor {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("persona-probe/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Absolute targets pass through; anything else is joined to `base_url`.
    pub fn resolve(&self, target: &str) -> String {
        if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("{}/{}", self.base_url, target.trim_start_matches('/'))
        }
    }

    async fn observe(&self, request: reqwest::RequestBuilder) -> Result<String, ExecutorError> {
        let response = request.send().await.map_err(map_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_error)?;
        Ok(format_observation(status, &body))
    }
}

/// `"<code> <reason> :: <body preview>"`, the preview capped in bytes
fn format_observation(status: reqwest::StatusCode, body: &str) -> String {
    format!(
        "{} {} :: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown"),
        truncate(body.trim(), BODY_PREVIEW_BYTES)
    )
}

fn map_error(e: reqwest::Error) -> ExecutorError {
    if e.is_timeout() {
        ExecutorError::Timeout
    } else {
        ExecutorError::Transport(e.to_string())
    }
}

#[async_trait]
impl Executor for RestExecutor {
    async fn initial_observation(&self) -> Result<String, ExecutorError> {
        self.observe(self.client.get(&self.base_url)).await
    }

    async fn execute(&self, action: &Action) -> Result<Execution, ExecutorError> {
        if action.is_report() {
            let issue = action.payload_str("issue").unwrap_or(&action.target);
            return Ok(Execution::new(format!("Report submitted: {}", issue), 0.0));
        }

        let start = Instant::now();
        let url = self.resolve(&action.target);
        let request = match action.action_type {
            ActionType::Navigate | ActionType::Scroll => self.client.get(url),
            _ => {
                let body = action.payload.clone().unwrap_or_default();
                self.client.post(url).json(&body)
            }
        };
        let observation = self.observe(request).await?;
        let latency_secs = start.elapsed().as_secs_f64();
        debug!(%action, latency_secs, "REST execution");
        Ok(Execution::new(observation, latency_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(base: &str) -> RestExecutor {
        RestExecutor::new(base, Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn test_resolve() {
        let rest = executor("http://localhost:8080/");
        assert_eq!(rest.resolve("/cart"), "http://localhost:8080/cart");
        assert_eq!(rest.resolve("cart"), "http://localhost:8080/cart");
        assert_eq!(rest.resolve("https://other.test/x"), "https://other.test/x");
    }

    #[test]
    fn test_observation_preview_is_byte_bounded() {
        let body = "é".repeat(400);
        let observation = format_observation(reqwest::StatusCode::OK, &body);
        let (head, preview) = observation.split_once(" :: ").unwrap();
        assert_eq!(head, "200 OK");
        assert!(preview.len() <= BODY_PREVIEW_BYTES);
        assert!(preview.ends_with("..."));

        let short = format_observation(reqwest::StatusCode::NOT_FOUND, "  missing \n");
        assert_eq!(short, "404 Not Found :: missing");
    }

    #[tokio::test]
    async fn test_report_never_hits_network() {
        let rest = executor("http://127.0.0.1:9");
        let result = rest.execute(&Action::report("bug", "broken")).await.unwrap();
        assert_eq!(result.observation, "Report submitted: broken");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let rest = executor("http://127.0.0.1:9");
        let result = rest.execute(&Action::new(ActionType::Navigate, "/")).await;
        assert!(matches!(result, Err(ExecutorError::Transport(_))));
    }
}
