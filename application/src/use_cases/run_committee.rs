//! Run Committee use case
//!
//! Orchestrates the three-round committee protocol for one turn.

use crate::config::CommitteeParams;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::proposal_source::{ProposalSource, SourceError};
use probe_domain::{ConsensusResult, Persona, Proposal, ProposalDraft, ProposalRound, TieBreakOrder};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Errors that can occur during a committee turn
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunCommitteeError {
    #[error("No proposal sources configured")]
    NoSources,

    #[error("No quorum: all {} sources abstained", abstained.len())]
    NoQuorum { abstained: Vec<String> },
}

/// The committee engine.
///
/// Holds the registered sources and the tie-break order computed once from
/// the seed; nothing else survives between turns.
pub struct RunCommitteeUseCase {
    sources: Vec<Arc<dyn ProposalSource>>,
    params: CommitteeParams,
    order: TieBreakOrder,
}

impl RunCommitteeUseCase {
    /// Register `sources` in order; their position is their registration index.
    pub fn new(
        sources: Vec<Arc<dyn ProposalSource>>,
        params: CommitteeParams,
    ) -> Result<Self, RunCommitteeError> {
        if sources.is_empty() {
            return Err(RunCommitteeError::NoSources);
        }
        let order = TieBreakOrder::from_seed(sources.len(), params.seed);
        debug!(
            "Committee of {} sources, tie-break order {:?}",
            sources.len(),
            order.preferred_order()
        );
        Ok(Self {
            sources,
            params,
            order,
        })
    }

    pub fn size(&self) -> usize {
        self.sources.len()
    }

    pub fn source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.id().to_string()).collect()
    }

    pub fn order(&self) -> &TieBreakOrder {
        &self.order
    }

    pub fn params(&self) -> &CommitteeParams {
        &self.params
    }

    /// Execute one turn with default (no-op) progress
    pub async fn execute(
        &self,
        observation: &str,
        persona: &Arc<Persona>,
    ) -> Result<ConsensusResult, RunCommitteeError> {
        self.execute_with_progress(observation, persona, &NoProgress)
            .await
    }

    /// Execute one turn with progress callbacks
    pub async fn execute_with_progress(
        &self,
        observation: &str,
        persona: &Arc<Persona>,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusResult, RunCommitteeError> {
        // Round 1: Independent proposals
        let (independent, abstained) = self
            .round_independent(observation, persona, progress)
            .await;
        if independent.is_empty() {
            warn!("No quorum: every source abstained in Round 1");
            return Err(RunCommitteeError::NoQuorum { abstained });
        }

        // Round 2: Discussion (needs at least two survivors to discuss anything)
        let discussion = if self.params.enable_discussion && independent.len() > 1 {
            Some(
                self.round_discussion(observation, persona, &independent, progress)
                    .await,
            )
        } else {
            debug!(
                "Skipping discussion round ({} survivor(s))",
                independent.len()
            );
            None
        };

        // Round 3: Vote
        let (final_round, history) = match discussion {
            Some(revised) => {
                let mut history = independent;
                history.extend(revised.iter().cloned());
                (revised, history)
            }
            None => (independent.clone(), independent),
        };

        let result = ConsensusResult::decide(
            final_round,
            history,
            abstained.clone(),
            &self.params.policy,
            &self.order,
        )
        .ok_or(RunCommitteeError::NoQuorum { abstained })?;

        info!(
            "Consensus: {} (agreement {:.2}, score {:.2}{})",
            result.action,
            result.agreement,
            result.score,
            if result.low_agreement { ", low agreement" } else { "" }
        );
        progress.on_consensus(&result);
        Ok(result)
    }

    /// Round 1: query every source concurrently with the observation only.
    ///
    /// Returns the surviving proposals in registration order and the ids of
    /// the sources that abstained.
    async fn round_independent(
        &self,
        observation: &str,
        persona: &Arc<Persona>,
        progress: &dyn ProgressNotifier,
    ) -> (Vec<Proposal>, Vec<String>) {
        let round = ProposalRound::Independent;
        info!("Round 1: Independent proposals from {} sources", self.sources.len());
        progress.on_round_start(round, self.sources.len());

        let mut join_set = JoinSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            let source = Arc::clone(source);
            let persona = Arc::clone(persona);
            let observation = observation.to_string();
            let timeout = self.params.source_timeout;

            join_set.spawn(async move {
                let result = Self::invoke(source.as_ref(), &observation, &persona, None, timeout).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<Result<ProposalDraft, SourceError>>> =
            vec![None; self.sources.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Task join error: {}", e),
            }
        }

        // Collect by registration index, not arrival order
        let mut proposals = Vec::new();
        let mut abstained = Vec::new();
        for (index, slot) in slots.into_iter().enumerate() {
            let source_id = self.sources[index].id();
            match slot {
                Some(Ok(draft)) => {
                    debug!(source = source_id, "Proposed {}", draft.action);
                    progress.on_source_complete(round, source_id, true);
                    proposals.push(Proposal::from_draft(source_id, index, round, draft));
                }
                Some(Err(e)) => {
                    warn!(source = source_id, "Abstaining this turn: {}", e);
                    progress.on_source_complete(round, source_id, false);
                    abstained.push(source_id.to_string());
                }
                None => {
                    warn!(source = source_id, "Abstaining this turn: task did not complete");
                    progress.on_source_complete(round, source_id, false);
                    abstained.push(source_id.to_string());
                }
            }
        }

        progress.on_round_complete(round);
        (proposals, abstained)
    }

    /// Round 2: each survivor sees the others' Round-1 proposals and may revise.
    ///
    /// A failure here keeps the source's Round-1 proposal.
    async fn round_discussion(
        &self,
        observation: &str,
        persona: &Arc<Persona>,
        independent: &[Proposal],
        progress: &dyn ProgressNotifier,
    ) -> Vec<Proposal> {
        let round = ProposalRound::Discussion;
        info!("Round 2: Discussion among {} sources", independent.len());
        progress.on_round_start(round, independent.len());

        let mut join_set = JoinSet::new();
        for (position, original) in independent.iter().enumerate() {
            let peers: Vec<Proposal> = independent
                .iter()
                .filter(|p| p.source_index != original.source_index)
                .cloned()
                .collect();
            let source = Arc::clone(&self.sources[original.source_index]);
            let persona = Arc::clone(persona);
            let observation = observation.to_string();
            let timeout = self.params.source_timeout;

            join_set.spawn(async move {
                let result = Self::invoke(
                    source.as_ref(),
                    &observation,
                    &persona,
                    Some(peers.as_slice()),
                    timeout,
                )
                .await;
                (position, result)
            });
        }

        let mut slots: Vec<Option<Result<ProposalDraft, SourceError>>> =
            vec![None; independent.len()];
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((position, result)) => slots[position] = Some(result),
                Err(e) => warn!("Task join error: {}", e),
            }
        }

        let revised = independent
            .iter()
            .zip(slots)
            .map(|(original, slot)| match slot {
                Some(Ok(draft)) => {
                    progress.on_source_complete(round, &original.source_id, true);
                    let proposal = Proposal::revised(original, draft);
                    if proposal.changed {
                        info!(
                            source = %original.source_id,
                            "Changed vote: {} -> {}",
                            original.action,
                            proposal.action
                        );
                    }
                    proposal
                }
                Some(Err(e)) => {
                    warn!(source = %original.source_id, "Keeping Round-1 proposal: {}", e);
                    progress.on_source_complete(round, &original.source_id, false);
                    Proposal::fallback_from(original)
                }
                None => {
                    warn!(source = %original.source_id, "Keeping Round-1 proposal: task did not complete");
                    progress.on_source_complete(round, &original.source_id, false);
                    Proposal::fallback_from(original)
                }
            })
            .collect();

        progress.on_round_complete(round);
        revised
    }

    /// One bounded source invocation; invalid drafts count as malformed
    async fn invoke(
        source: &dyn ProposalSource,
        observation: &str,
        persona: &Persona,
        peers: Option<&[Proposal]>,
        timeout: std::time::Duration,
    ) -> Result<ProposalDraft, SourceError> {
        let draft = tokio::time::timeout(timeout, source.propose(observation, persona, peers))
            .await
            .map_err(|_| SourceError::Timeout)??;
        draft.check()?;
        Ok(draft)
    }
}
