//! Run Session use case
//!
//! The session state machine: sequences committee, validation, execution and
//! recording turn by turn until a termination condition holds.
//!
//! ```text
//!  created ──▶ running ──┬──▶ completed   (max turns, or a `report` action)
//!                        ├──▶ failed      (no quorum, hard validation failure,
//!                        │                 execution failure)
//!                        └──▶ aborted     (cancellation, checked between turns)
//! ```

use crate::config::{LowAgreementPolicy, SessionConfig};
use crate::ports::executor::{Executor, ExecutorError};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::proposal_source::ProposalSource;
use crate::ports::turn_emitter::TurnRecordEmitter;
use crate::use_cases::run_committee::{RunCommitteeError, RunCommitteeUseCase};
use probe_domain::core::issue::ConfigIssue;
use probe_domain::validation::RefusalCheck;
use probe_domain::{
    DomainError, Persona, SafetyProfile, SessionState, SessionStatus, TerminationReason,
    TurnFailure, TurnRecord, ValidationOutcome, ValidationPipeline,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Errors that prevent a session from running at all.
///
/// A session that starts and then fails or is aborted is not an error: it
/// is reported through [`SessionReport::status`].
#[derive(Error, Debug)]
pub enum RunSessionError {
    #[error("Invalid session configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Committee(#[from] RunCommitteeError),

    #[error("Could not obtain the initial observation: {0}")]
    InitialObservation(#[source] ExecutorError),

    #[error("Session state error: {0}")]
    State(#[from] DomainError),
}

/// Input for the RunSession use case
#[derive(Debug, Clone)]
pub struct RunSessionInput {
    pub persona: Persona,
    /// Overrides the executor's initial observation
    pub initial_observation: Option<String>,
    /// Generated when absent
    pub session_id: Option<String>,
}

impl RunSessionInput {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            initial_observation: None,
            session_id: None,
        }
    }

    pub fn with_initial_observation(mut self, observation: impl Into<String>) -> Self {
        self.initial_observation = Some(observation.into());
        self
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

/// What a finished session hands back to its caller
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: String,
    pub persona: String,
    pub status: SessionStatus,
    pub termination: Option<TerminationReason>,
    pub safety_profile: SafetyProfile,
    /// Executed turns; a failed final iteration is not counted
    pub turns_executed: u32,
    pub max_turns: u32,
    /// Every emitted turn record, in order
    pub turns: Vec<TurnRecord>,
}

impl SessionReport {
    fn from_state(state: SessionState, persona: &Persona, profile: SafetyProfile, max_turns: u32) -> Self {
        Self {
            session_id: state.id,
            persona: persona.name.clone(),
            status: state.status,
            termination: state.termination,
            safety_profile: profile,
            turns_executed: state.turn_counter,
            max_turns,
            turns: state.turns,
        }
    }

    pub fn last_failure(&self) -> Option<&TurnFailure> {
        self.turns.last().and_then(|t| t.failure.as_ref())
    }
}

/// Session identifier: UTC timestamp plus eight random hex digits
pub fn generate_session_id() -> String {
    format!(
        "{}_{:08x}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        rand::random::<u32>()
    )
}

/// Use case for running one test session
pub struct RunSessionUseCase {
    committee: RunCommitteeUseCase,
    executor: Arc<dyn Executor>,
    emitter: Arc<dyn TurnRecordEmitter>,
    config: SessionConfig,
    cancellation_token: Option<CancellationToken>,
}

impl RunSessionUseCase {
    pub fn new(
        sources: Vec<Arc<dyn ProposalSource>>,
        executor: Arc<dyn Executor>,
        emitter: Arc<dyn TurnRecordEmitter>,
        config: SessionConfig,
    ) -> Result<Self, RunSessionError> {
        let issues = config.validate();
        if ConfigIssue::has_errors(&issues) {
            let messages: Vec<_> = issues.iter().map(|i| i.message.as_str()).collect();
            return Err(RunSessionError::InvalidConfig(messages.join("; ")));
        }
        let committee = RunCommitteeUseCase::new(sources, config.committee.clone())?;
        Ok(Self {
            committee,
            executor,
            emitter,
            config,
            cancellation_token: None,
        })
    }

    /// Set a cancellation token for graceful interruption
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn committee(&self) -> &RunCommitteeUseCase {
        &self.committee
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunSessionInput) -> Result<SessionReport, RunSessionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunSessionInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SessionReport, RunSessionError> {
        let persona = Arc::new(input.persona);
        let profile = self.config.safety.resolve(&persona);
        let pipeline = ValidationPipeline::standard(profile, self.config.goal_policy);

        let observation = match input.initial_observation {
            Some(observation) => observation,
            None => self
                .executor
                .initial_observation()
                .await
                .map_err(RunSessionError::InitialObservation)?,
        };
        let session_id = input.session_id.unwrap_or_else(generate_session_id);
        let mut state = SessionState::new(session_id, observation);

        info!(
            session = %state.id,
            "Starting session for '{}' ({} sources, max {} turns, {} safety)",
            persona.name,
            self.committee.size(),
            self.config.max_turns,
            profile
        );
        self.emitter.session_start(&state.id, &persona);
        progress.on_session_start(&state.id, self.config.max_turns);
        state.start()?;

        loop {
            if self.is_cancelled() {
                info!(session = %state.id, "Cancellation requested; aborting before turn {}", state.next_turn());
                state.abort()?;
                break;
            }

            if let Some(reason) = self
                .run_turn(&mut state, &persona, &pipeline, progress)
                .await?
            {
                if !state.is_terminal() {
                    state.finish(reason)?;
                }
                break;
            }
        }

        info!(
            session = %state.id,
            "Session {} after {} turn(s)",
            state.status,
            state.turn_counter
        );
        self.emitter.session_end(&state);
        progress.on_session_end(&state);

        Ok(SessionReport::from_state(
            state,
            &persona,
            profile,
            self.config.max_turns,
        ))
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// One loop iteration. Returns the reason to stop, if any.
    async fn run_turn(
        &self,
        state: &mut SessionState,
        persona: &Arc<Persona>,
        pipeline: &ValidationPipeline,
        progress: &dyn ProgressNotifier,
    ) -> Result<Option<TerminationReason>, RunSessionError> {
        let turn = state.next_turn();
        info!(session = %state.id, turn, "Turn {} started", turn);
        progress.on_turn_start(turn);
        let record = TurnRecord::new(&state.id, turn, &state.observation);

        // Committee
        let consensus = match self
            .committee
            .execute_with_progress(&state.observation, persona, progress)
            .await
        {
            Ok(consensus) => consensus,
            Err(RunCommitteeError::NoQuorum { abstained }) => {
                let record = record.with_failure(TurnFailure::NoQuorum { abstained });
                return self.fail_turn(state, record, progress).map(Some);
            }
            Err(e) => return Err(e.into()),
        };
        let action = consensus.action.clone();

        // Validation
        let validation = if consensus.low_agreement
            && self.config.low_agreement == LowAgreementPolicy::Block
        {
            ValidationOutcome::blocked(
                "agreement",
                format!(
                    "agreement {:.2} is below the minimum {:.2}",
                    consensus.agreement, self.config.committee.policy.min_agreement
                ),
            )
        } else {
            pipeline.run(&action, persona)
        };
        progress.on_validation(&validation);
        for soft in &validation.soft_failures {
            info!(session = %state.id, turn, "Soft failure: {}", soft);
        }
        let record = record
            .with_consensus(consensus)
            .with_validation(validation.clone());

        if let Some(failure) = validation.failure {
            let record = record.with_failure(TurnFailure::ValidationHardFailure {
                check: failure.check,
                reason: failure.reason,
            });
            return self.fail_turn(state, record, progress).map(Some);
        }

        // Execution
        let execution = match self.executor.execute(&action).await {
            Ok(execution) => execution,
            Err(e) => {
                let record = record.with_failure(TurnFailure::ExecutionFailure {
                    reason: e.to_string(),
                });
                return self.fail_turn(state, record, progress).map(Some);
            }
        };
        info!(
            session = %state.id,
            turn,
            "Executed {} in {:.3}s",
            action,
            execution.latency_secs
        );

        let refusal = RefusalCheck.evaluate(&action, &execution.observation, persona);
        let record = record.with_execution(execution).with_refusal(refusal);

        self.emitter.emit(&record);
        progress.on_turn_complete(&record);
        state.record_success(record)?;

        Ok(state.completion_reason(self.config.max_turns))
    }

    fn fail_turn(
        &self,
        state: &mut SessionState,
        record: TurnRecord,
        progress: &dyn ProgressNotifier,
    ) -> Result<TerminationReason, RunSessionError> {
        if let Some(failure) = &record.failure {
            warn!(session = %state.id, turn = record.turn, "Turn failed: {}", failure);
        }
        self.emitter.emit(&record);
        progress.on_turn_complete(&record);
        Ok(state.record_failure(record)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::proposal_source::SourceError;
    use crate::config::{CommitteeParams, SafetySelection};
    use async_trait::async_trait;
    use probe_domain::{Action, ActionType, Execution, ProposalDraft, Proposal, RefusalVerdict};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Proposes `script[n]` on the n-th Round-1 call and repeats itself in Round 2
    struct StubSource {
        id: String,
        script: Vec<Option<Action>>,
        calls: AtomicUsize,
        confidence: f64,
    }

    impl StubSource {
        fn new(id: &str, script: Vec<Option<Action>>) -> Arc<dyn ProposalSource> {
            Self::with_confidence(id, script, 0.8)
        }

        fn with_confidence(id: &str, script: Vec<Option<Action>>, confidence: f64) -> Arc<dyn ProposalSource> {
            Arc::new(Self {
                id: id.to_string(),
                script,
                calls: AtomicUsize::new(0),
                confidence,
            })
        }

        /// Always proposes the same action
        fn repeating(id: &str, action: Action) -> Arc<dyn ProposalSource> {
            Self::new(id, vec![Some(action); 16])
        }
    }

    #[async_trait]
    impl ProposalSource for StubSource {
        fn id(&self) -> &str {
            &self.id
        }

        async fn propose(
            &self,
            _observation: &str,
            _persona: &Persona,
            peers: Option<&[Proposal]>,
        ) -> Result<ProposalDraft, SourceError> {
            let call = if peers.is_some() {
                self.calls.load(Ordering::SeqCst).saturating_sub(1)
            } else {
                self.calls.fetch_add(1, Ordering::SeqCst)
            };
            match self.script.get(call).cloned().flatten() {
                Some(action) => Ok(ProposalDraft {
                    action,
                    confidence: self.confidence,
                    rationale: String::new(),
                }),
                None => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(SourceError::Timeout)
                }
            }
        }
    }

    #[derive(Default)]
    struct StubExecutor {
        executed: Mutex<Vec<Action>>,
        fail_on: Option<usize>,
        reply: Option<String>,
        initial: Option<String>,
        cancel_on_execute: Option<CancellationToken>,
    }

    #[async_trait]
    impl Executor for StubExecutor {
        async fn initial_observation(&self) -> Result<String, ExecutorError> {
            Ok(self.initial.clone().unwrap_or_else(|| "home page".to_string()))
        }

        async fn execute(&self, action: &Action) -> Result<Execution, ExecutorError> {
            if let Some(token) = &self.cancel_on_execute {
                token.cancel();
            }
            let mut executed = self.executed.lock().unwrap();
            executed.push(action.clone());
            if self.fail_on == Some(executed.len()) {
                return Err(ExecutorError::Transport("connection reset".into()));
            }
            let observation = self
                .reply
                .clone()
                .unwrap_or_else(|| format!("page after step {}", executed.len()));
            Ok(Execution::new(observation, 0.05))
        }
    }

    /// Navigates to a page named after the observation it was shown
    struct ObservationSource;

    #[async_trait]
    impl ProposalSource for ObservationSource {
        fn id(&self) -> &str {
            "observer"
        }

        async fn propose(
            &self,
            observation: &str,
            _persona: &Persona,
            _peers: Option<&[Proposal]>,
        ) -> Result<ProposalDraft, SourceError> {
            Ok(ProposalDraft {
                action: Action::new(ActionType::Navigate, format!("/seen/{}", observation)),
                confidence: 0.9,
                rationale: String::new(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingEmitter {
        records: Mutex<Vec<TurnRecord>>,
        events: Mutex<Vec<String>>,
    }

    impl TurnRecordEmitter for RecordingEmitter {
        fn emit(&self, record: &TurnRecord) {
            self.records.lock().unwrap().push(record.clone());
        }

        fn session_start(&self, session_id: &str, _persona: &Persona) {
            self.events.lock().unwrap().push(format!("start {}", session_id));
        }

        fn session_end(&self, state: &SessionState) {
            self.events.lock().unwrap().push(format!("end {}", state.status));
        }
    }

    fn shopper() -> Persona {
        Persona::new("Shopper", vec!["Search for running shoes".to_string()])
    }

    fn search() -> Action {
        Action::new(ActionType::Type, "#search").with_payload("text", "running shoes")
    }

    fn config() -> SessionConfig {
        SessionConfig::default().with_committee(
            CommitteeParams::default().with_source_timeout(Duration::from_millis(50)),
        )
    }

    fn session(
        sources: Vec<Arc<dyn ProposalSource>>,
        executor: Arc<StubExecutor>,
        emitter: Arc<RecordingEmitter>,
        config: SessionConfig,
    ) -> RunSessionUseCase {
        RunSessionUseCase::new(sources, executor, emitter, config).unwrap()
    }

    #[tokio::test]
    async fn test_completes_at_max_turns() {
        let executor = Arc::new(StubExecutor::default());
        let emitter = Arc::new(RecordingEmitter::default());
        let use_case = session(
            vec![
                StubSource::repeating("a", search()),
                StubSource::repeating("b", search()),
                StubSource::repeating("c", Action::new(ActionType::Scroll, "down")),
            ],
            executor.clone(),
            emitter.clone(),
            config().with_max_turns(3),
        );

        let report = use_case
            .execute(RunSessionInput::new(shopper()).with_session_id("s-max"))
            .await
            .unwrap();

        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.termination, Some(TerminationReason::MaxTurns));
        assert_eq!(report.turns_executed, 3);
        assert_eq!(executor.executed.lock().unwrap().len(), 3);

        let records = emitter.records.lock().unwrap();
        let numbers: Vec<u32> = records.iter().map(|r| r.turn).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        // Each turn starts from the previous turn's observation
        assert_eq!(records[0].observation, "home page");
        assert_eq!(records[2].observation, "page after step 2");
        assert_eq!(
            *emitter.events.lock().unwrap(),
            vec!["start s-max".to_string(), "end completed".to_string()]
        );
    }

    #[tokio::test]
    async fn test_report_action_completes_early() {
        let executor = Arc::new(StubExecutor::default());
        let emitter = Arc::new(RecordingEmitter::default());
        let script = vec![Some(search()), Some(Action::report("done", "found the shoes"))];
        let use_case = session(
            vec![StubSource::new("a", script.clone()), StubSource::new("b", script)],
            executor,
            emitter,
            config().with_max_turns(10),
        );

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();
        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.termination, Some(TerminationReason::Reported));
        assert_eq!(report.turns_executed, 2);
    }

    #[tokio::test]
    async fn test_unsafe_action_never_executes() {
        let executor = Arc::new(StubExecutor::default());
        let emitter = Arc::new(RecordingEmitter::default());
        let injection = Action::new(ActionType::Navigate, "' OR 1=1--");
        let use_case = session(
            vec![
                StubSource::repeating("a", injection.clone()),
                StubSource::repeating("b", injection.clone()),
                StubSource::repeating("c", injection),
            ],
            executor.clone(),
            emitter.clone(),
            config().with_safety(SafetySelection::Fixed(SafetyProfile::Strict)),
        );

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.status, SessionStatus::Failed);
        assert_eq!(report.termination, Some(TerminationReason::ValidationFailed));
        assert!(executor.executed.lock().unwrap().is_empty());
        assert!(matches!(
            report.last_failure(),
            Some(TurnFailure::ValidationHardFailure { check, .. }) if check == "safety"
        ));
        let records = emitter.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].execution.is_none());
    }

    #[tokio::test]
    async fn test_all_sources_time_out() {
        let executor = Arc::new(StubExecutor::default());
        let emitter = Arc::new(RecordingEmitter::default());
        let use_case = session(
            vec![
                StubSource::new("a", vec![None]),
                StubSource::new("b", vec![None]),
                StubSource::new("c", vec![None]),
            ],
            executor.clone(),
            emitter.clone(),
            config(),
        );

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.status, SessionStatus::Failed);
        assert_eq!(report.termination, Some(TerminationReason::NoQuorum));
        assert_eq!(report.turns_executed, 0);
        assert!(executor.executed.lock().unwrap().is_empty());
        // The failed iteration still emits exactly one record
        let records = emitter.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].turn, 1);
        assert!(records[0].consensus.is_none());
    }

    #[tokio::test]
    async fn test_execution_failure_ends_session() {
        let executor = Arc::new(StubExecutor {
            fail_on: Some(2),
            ..Default::default()
        });
        let emitter = Arc::new(RecordingEmitter::default());
        let use_case = session(
            vec![StubSource::repeating("a", search())],
            executor.clone(),
            emitter.clone(),
            config(),
        );

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.status, SessionStatus::Failed);
        assert_eq!(report.termination, Some(TerminationReason::ExecutionFailed));
        assert_eq!(report.turns_executed, 1);
        // Not retried
        assert_eq!(executor.executed.lock().unwrap().len(), 2);
        assert_eq!(emitter.records.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_low_agreement_block() {
        let sources = || {
            vec![
                StubSource::repeating("a", search()),
                StubSource::repeating("b", Action::new(ActionType::Scroll, "down")),
                StubSource::repeating("c", Action::new(ActionType::Navigate, "/shoes")),
            ]
        };
        let strict_agreement = config()
            .with_max_turns(1)
            .with_committee(
                CommitteeParams::default()
                    .with_source_timeout(Duration::from_millis(50))
                    .with_policy(probe_domain::ConsensusPolicy::default().with_min_agreement(0.5)),
            );

        let executor = Arc::new(StubExecutor::default());
        let advisory = session(
            sources(),
            executor.clone(),
            Arc::new(RecordingEmitter::default()),
            strict_agreement.clone(),
        );
        let report = advisory.execute(RunSessionInput::new(shopper())).await.unwrap();
        assert_eq!(report.status, SessionStatus::Completed);
        assert!(report.turns[0].consensus.as_ref().unwrap().low_agreement);

        let executor = Arc::new(StubExecutor::default());
        let blocking = session(
            sources(),
            executor.clone(),
            Arc::new(RecordingEmitter::default()),
            strict_agreement.with_low_agreement(LowAgreementPolicy::Block),
        );
        let report = blocking.execute(RunSessionInput::new(shopper())).await.unwrap();
        assert_eq!(report.status, SessionStatus::Failed);
        assert!(matches!(
            report.last_failure(),
            Some(TurnFailure::ValidationHardFailure { check, .. }) if check == "agreement"
        ));
        assert!(executor.executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_before_first_turn() {
        let executor = Arc::new(StubExecutor::default());
        let emitter = Arc::new(RecordingEmitter::default());
        let token = CancellationToken::new();
        token.cancel();
        let use_case = session(
            vec![StubSource::repeating("a", search())],
            executor.clone(),
            emitter.clone(),
            config(),
        )
        .with_cancellation(token);

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.status, SessionStatus::Aborted);
        assert_eq!(report.termination, Some(TerminationReason::Cancelled));
        assert!(report.turns.is_empty());
        assert!(executor.executed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_mid_turn_finishes_the_turn() {
        let token = CancellationToken::new();
        let executor = Arc::new(StubExecutor {
            cancel_on_execute: Some(token.clone()),
            ..Default::default()
        });
        let emitter = Arc::new(RecordingEmitter::default());
        let use_case = session(
            vec![StubSource::repeating("a", search())],
            executor.clone(),
            emitter.clone(),
            config().with_max_turns(5),
        )
        .with_cancellation(token);

        let report = use_case.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.status, SessionStatus::Aborted);
        assert_eq!(report.termination, Some(TerminationReason::Cancelled));
        assert_eq!(report.turns_executed, 1);
        assert_eq!(executor.executed.lock().unwrap().len(), 1);
        let records = emitter.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_success());
    }

    #[tokio::test]
    async fn test_only_the_observation_carries_over() {
        let sources = || vec![Arc::new(ObservationSource) as Arc<dyn ProposalSource>];

        let emitter = Arc::new(RecordingEmitter::default());
        let first = session(
            sources(),
            Arc::new(StubExecutor::default()),
            emitter.clone(),
            config().with_max_turns(2),
        );
        let report = first.execute(RunSessionInput::new(shopper())).await.unwrap();
        assert_eq!(report.turns_executed, 2);
        let records = emitter.records.lock().unwrap().clone();

        // Resume from the first record's outcome in a fresh session
        let carried = records[0].execution.as_ref().unwrap().observation.clone();
        let resumed = session(
            sources(),
            Arc::new(StubExecutor {
                initial: Some(carried),
                ..Default::default()
            }),
            Arc::new(RecordingEmitter::default()),
            config().with_max_turns(1),
        );
        let report = resumed.execute(RunSessionInput::new(shopper())).await.unwrap();

        assert_eq!(report.turns[0].action(), records[1].action());
        assert_eq!(
            records[1].action().map(|a| a.target.as_str()),
            Some("/seen/page after step 1")
        );
    }

    #[tokio::test]
    async fn test_refusal_recorded_for_adversarial_persona() {
        let executor = Arc::new(StubExecutor {
            reply: Some("403 Forbidden :: request not allowed".to_string()),
            ..Default::default()
        });
        let persona = Persona::new("Red team", vec!["Search the catalog".to_string()])
            .with_trait("adversarial", true);
        let probe = Action::new(ActionType::Type, "#search").with_payload("text", "../../etc");
        let use_case = session(
            vec![StubSource::repeating("a", probe)],
            executor,
            Arc::new(RecordingEmitter::default()),
            config().with_max_turns(1).with_safety(SafetySelection::Fixed(SafetyProfile::Balanced)),
        );

        let report = use_case.execute(RunSessionInput::new(persona)).await.unwrap();
        assert_eq!(report.status, SessionStatus::Completed);
        assert_eq!(report.turns[0].refusal, Some(RefusalVerdict::Refused));
        // Path traversal is advisory under the balanced profile
        assert!(!report.turns[0].validation.as_ref().unwrap().advisories.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let result = RunSessionUseCase::new(
            vec![StubSource::repeating("a", search())],
            Arc::new(StubExecutor::default()),
            Arc::new(RecordingEmitter::default()),
            config().with_max_turns(0),
        );
        assert!(matches!(result, Err(RunSessionError::InvalidConfig(_))));

        let result = RunSessionUseCase::new(
            vec![],
            Arc::new(StubExecutor::default()),
            Arc::new(RecordingEmitter::default()),
            config(),
        );
        assert!(matches!(
            result,
            Err(RunSessionError::Committee(RunCommitteeError::NoSources))
        ));
    }

    #[tokio::test]
    async fn test_same_inputs_same_decisions() {
        let run = || async {
            let use_case = session(
                vec![
                    StubSource::with_confidence("a", vec![Some(search()); 4], 0.5),
                    StubSource::with_confidence(
                        "b",
                        vec![Some(Action::new(ActionType::Navigate, "/shoes")); 4],
                        0.5,
                    ),
                ],
                Arc::new(StubExecutor::default()),
                Arc::new(RecordingEmitter::default()),
                config().with_max_turns(3),
            );
            let report = use_case
                .execute(RunSessionInput::new(shopper()).with_session_id("fixed"))
                .await
                .unwrap();
            report
                .turns
                .into_iter()
                .map(|t| t.consensus)
                .collect::<Vec<_>>()
        };
        assert_eq!(run().await, run().await);
    }

    #[test]
    fn test_session_id_shape() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }
}
