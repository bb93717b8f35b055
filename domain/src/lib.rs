//! Domain layer for persona-probe
//!
//! This crate contains the decision-and-validation logic of an automated
//! exploratory tester. It has no dependencies on infrastructure or
//! presentation concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Committee
//!
//! A fixed set of proposal sources each suggest an [`Action`] for the current
//! observation. Their proposals go through a discussion round and a weighted
//! vote; the result is a [`ConsensusResult`].
//!
//! ## Validation
//!
//! The consensus action passes through an ordered
//! [`ValidationPipeline`](validation::ValidationPipeline) (schema, goal
//! alignment, safety) before anything is executed.
//!
//! ## Session
//!
//! [`SessionState`](session::SessionState) tracks one run of the turn loop
//! and refuses further turns once it reaches a terminal status.

pub mod action;
pub mod committee;
pub mod core;
pub mod persona;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use action::{Action, ActionKey, ActionType};
pub use committee::{
    ConsensusPolicy, ConsensusResult, Proposal, ProposalDraft, ProposalRound, TieBreakOrder,
    VoteGroup, parse_proposal_json,
};
pub use core::{
    error::DomainError,
    issue::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use persona::{Persona, Tone};
pub use session::{
    Execution, SessionState, SessionStatus, TerminationReason, TurnFailure, TurnRecord,
};
pub use validation::{
    GoalPolicy, RefusalVerdict, SafetyProfile, ValidationOutcome, ValidationPipeline,
};
