//! Application layer for persona-probe
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CommitteeParams, LowAgreementPolicy, SafetySelection, SessionConfig};
pub use ports::{
    executor::{Executor, ExecutorError},
    progress::{NoProgress, ProgressNotifier},
    proposal_source::{ProposalSource, SourceError},
    turn_emitter::{NoEmitter, TurnRecordEmitter},
};
pub use use_cases::run_committee::{RunCommitteeError, RunCommitteeUseCase};
pub use use_cases::run_session::{
    RunSessionError, RunSessionInput, RunSessionUseCase, SessionReport, generate_session_id,
};
