//! Command proposal source: one external process per proposal.
//!
//! The request is written to the child's stdin as a single JSON object:
//!
//! ```json
//! {"observation": "...", "persona": {...}, "round": 1, "peers": null}
//! ```
//!
//! The child answers on stdout with a proposal, in any of the shapes
//! [`parse_proposal_json`] accepts. A non-zero exit makes the source
//! unavailable for this call. Timeouts are enforced by the committee; the
//! child is killed when the future is dropped.

use async_trait::async_trait;
use probe_application::{ProposalSource, SourceError};
use probe_domain::committee::parse_proposal_json;
use probe_domain::{Persona, Proposal, ProposalDraft};
use serde::Serialize;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Serialize)]
struct ProposalRequest<'a> {
    observation: &'a str,
    persona: &'a Persona,
    round: u8,
    peers: Option<&'a [Proposal]>,
}

pub struct CommandProposalSource {
    id: String,
    program: String,
    args: Vec<String>,
}

impl CommandProposalSource {
    pub fn new(id: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            id: id.into(),
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl ProposalSource for CommandProposalSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn propose(
        &self,
        observation: &str,
        persona: &Persona,
        peers: Option<&[Proposal]>,
    ) -> Result<ProposalDraft, SourceError> {
        let request = ProposalRequest {
            observation,
            persona,
            round: if peers.is_some() { 2 } else { 1 },
            peers,
        };
        let input =
            serde_json::to_vec(&request).map_err(|e| SourceError::Other(e.to_string()))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                SourceError::Unavailable(format!("Failed to spawn {}: {}", self.program, e))
            })?;

        // Written from its own task so stdout is drained while the request is
        // still being sent. A child that exits without reading its input is
        // judged by its exit status.
        let writer = child.stdin.take().map(|mut stdin| {
            let source = self.id.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&input).await {
                    debug!(source = %source, error = %e, "Failed to write request");
                }
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| SourceError::Unavailable(format!("{} failed: {}", self.program, e)))?;

        if let Some(writer) = writer
            && let Err(e) = writer.await
        {
            debug!(source = %self.id, error = %e, "Request writer did not finish");
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(source = %self.id, bytes = stdout.len(), "Command source responded");
        parse_proposal_json(&stdout).map_err(|e| SourceError::Malformed(e.to_string()))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use probe_domain::ActionType;

    fn persona() -> Persona {
        Persona::new("p", vec![])
    }

    fn shell(id: &str, script: &str) -> CommandProposalSource {
        CommandProposalSource::new(id, "sh", vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_parses_stdout() {
        let source = shell(
            "echo",
            r##"cat > /dev/null; echo 'Here you go: {"type": "click", "target": "#buy", "confidence": 0.6}'"##,
        );
        let draft = source.propose("obs", &persona(), None).await.unwrap();
        assert_eq!(draft.action.action_type, ActionType::Click);
        assert_eq!(draft.confidence, 0.6);
    }

    #[tokio::test]
    async fn test_receives_request_on_stdin() {
        // Echo the round number back as the target
        let source = shell(
            "round",
            r#"round=$(sed -n 's/.*"round":\([0-9]\).*/\1/p'); echo "{\"type\": \"navigate\", \"target\": \"/r$round\"}""#,
        );
        let draft = source.propose("obs", &persona(), Some(&[])).await.unwrap();
        assert_eq!(draft.action.target, "/r2");
    }

    #[tokio::test]
    async fn test_large_request_and_response_do_not_stall() {
        // The child fills its stdout pipe before reading a request that is
        // itself larger than the stdin pipe buffer
        let source = shell(
            "chatty",
            r##"head -c 200000 /dev/zero | tr '\0' ' '; cat > /dev/null; echo '{"type": "click", "target": "#buy"}'"##,
        );
        let observation = "x".repeat(200_000);
        let draft = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            source.propose(&observation, &persona(), None),
        )
        .await
        .expect("command source stalled")
        .unwrap();
        assert_eq!(draft.action.target, "#buy");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_unavailable() {
        let source = shell("fail", "cat > /dev/null; echo boom >&2; exit 3");
        match source.propose("obs", &persona(), None).await {
            Err(SourceError::Unavailable(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prose_is_malformed() {
        let source = shell("prose", "cat > /dev/null; echo 'I would click buy'");
        assert!(matches!(
            source.propose("obs", &persona(), None).await,
            Err(SourceError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let source = CommandProposalSource::new("none", "/nonexistent/program", vec![]);
        assert!(matches!(
            source.propose("obs", &persona(), None).await,
            Err(SourceError::Unavailable(_))
        ));
    }
}
