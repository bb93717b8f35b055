//! Port for the turn-record audit trail.
//!
//! This is separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while this port receives every turn record
//! in full for persistence (JSONL, a database, ...).

use probe_domain::{Persona, SessionState, TurnRecord};

/// Receives session events and one record per turn.
///
/// Methods are synchronous and non-fallible. Delivery failures are the
/// implementation's to log; they never reach the session.
pub trait TurnRecordEmitter: Send + Sync {
    fn emit(&self, record: &TurnRecord);

    fn session_start(&self, _session_id: &str, _persona: &Persona) {}

    /// Called once with the frozen final state
    fn session_end(&self, _state: &SessionState) {}
}

/// No-op implementation for tests and when no turn log is configured.
pub struct NoEmitter;

impl TurnRecordEmitter for NoEmitter {
    fn emit(&self, _record: &TurnRecord) {}
}
