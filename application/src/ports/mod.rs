//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod executor;
pub mod progress;
pub mod proposal_source;
pub mod turn_emitter;
