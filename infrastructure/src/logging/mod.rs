//! Logging infrastructure: the structured turn log.
//!
//! Provides [`JsonlTurnLogger`], a JSONL file writer that implements the
//! [`TurnRecordEmitter`](probe_application::TurnRecordEmitter) port.

mod jsonl_turn_logger;

pub use jsonl_turn_logger::JsonlTurnLogger;
