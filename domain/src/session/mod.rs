//! Session domain: lifecycle status, turn records, and the session state
//! the state machine owns.

pub mod record;
pub mod state;
pub mod status;

pub use record::{Execution, TurnFailure, TurnRecord};
pub use state::SessionState;
pub use status::{SessionStatus, TerminationReason};
