//! Scripted proposal source: replays a fixed list of proposals.
//!
//! Round 1 takes the next step from the script. Round 2 either holds that
//! step or, in follow mode, switches to the action most of its peers chose.

use crate::config::FileScriptStep;
use async_trait::async_trait;
use probe_application::{ProposalSource, SourceError};
use probe_domain::{Persona, Proposal, ProposalDraft};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

pub struct ScriptedProposalSource {
    id: String,
    script: Vec<FileScriptStep>,
    follow_majority: bool,
    /// Index of the next Round-1 step
    cursor: AtomicUsize,
}

impl ScriptedProposalSource {
    pub fn new(id: impl Into<String>, script: Vec<FileScriptStep>, follow_majority: bool) -> Self {
        Self {
            id: id.into(),
            script,
            follow_majority,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Steps not yet proposed
    pub fn remaining(&self) -> usize {
        self.script
            .len()
            .saturating_sub(self.cursor.load(Ordering::SeqCst))
    }

    fn current_step(&self) -> Option<&FileScriptStep> {
        let proposed = self.cursor.load(Ordering::SeqCst);
        proposed.checked_sub(1).and_then(|i| self.script.get(i))
    }

    /// The action shared by the most peers; ties go to the earliest peer.
    fn peer_majority(peers: &[Proposal]) -> Option<&Proposal> {
        let mut best: Option<(&Proposal, usize)> = None;
        for peer in peers {
            let count = peers
                .iter()
                .filter(|p| p.action.same_vote(&peer.action))
                .count();
            if best.is_none_or(|(_, c)| count > c) {
                best = Some((peer, count));
            }
        }
        best.map(|(p, _)| p)
    }
}

#[async_trait]
impl ProposalSource for ScriptedProposalSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn propose(
        &self,
        _observation: &str,
        _persona: &Persona,
        peers: Option<&[Proposal]>,
    ) -> Result<ProposalDraft, SourceError> {
        let step = match peers {
            None => {
                let index = self.cursor.fetch_add(1, Ordering::SeqCst);
                debug!(source = %self.id, remaining = self.remaining(), "Scripted step taken");
                self.script.get(index)
            }
            Some(_) => self.current_step(),
        }
        .ok_or_else(|| SourceError::Unavailable(format!("{}: script exhausted", self.id)))?;

        if let Some(delay) = step.delay_ms {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let mut draft = step.to_draft();
        if self.follow_majority
            && let Some(majority) = peers.and_then(Self::peer_majority)
            && !majority.action.same_vote(&draft.action)
        {
            debug!(source = %self.id, action = %majority.action, "Following peer majority");
            draft.action = majority.action.clone();
            draft.rationale = format!("Following peer majority (first proposed by {})", majority.source_id);
        }
        Ok(draft)
    }
}
