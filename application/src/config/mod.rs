//! Application-level configuration.
//!
//! This module provides the explicit configuration values the use cases are
//! constructed with. Nothing here reads files or the environment; the
//! infrastructure layer builds these from its own file format.
//!
//! - [`CommitteeParams`]: consensus policy, tie-break seed, per-source timeout
//! - [`SessionConfig`]: turn limit plus validation and low-agreement policy

pub mod committee_params;
pub mod session_config;

pub use committee_params::CommitteeParams;
pub use session_config::{LowAgreementPolicy, SafetySelection, SessionConfig};
