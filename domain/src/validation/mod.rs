//! Action validation: a fixed pipeline of checks applied before execution,
//! plus the post-execution refusal check.
//!
//! ```text
//! Action ──▶ schema ──▶ goal ──▶ safety ──▶ ValidationOutcome
//!              │          │        │
//!            (hard)   (soft or   (hard,
//!                      hard)   per profile)
//! ```
//!
//! The first hard failure stops the pipeline; soft failures are recorded
//! and the next check runs.

pub mod check;
pub mod goal;
pub mod pipeline;
pub mod refusal;
pub mod safety;
pub mod schema;

pub use check::{ActionCheck, CheckSeverity, Verdict};
pub use goal::{GoalAlignmentCheck, GoalPolicy};
pub use pipeline::{CheckFailure, CheckResult, ValidationOutcome, ValidationPipeline};
pub use refusal::{RefusalCheck, RefusalVerdict};
pub use safety::{AttackFamily, SafetyCheck, SafetyFinding, SafetyProfile};
pub use schema::SchemaCheck;
