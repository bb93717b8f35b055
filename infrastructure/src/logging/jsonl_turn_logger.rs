//! JSONL file writer for turn records and session events.
//!
//! Every line is one JSON object with a `type` field (`session_start`,
//! `turn`, `session_end`) and a `timestamp`. Turn lines carry the full
//! [`TurnRecord`] flattened into the object.

use probe_application::TurnRecordEmitter;
use probe_domain::{Persona, SessionState, TurnRecord};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL turn logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and on `Drop`.
pub struct JsonlTurnLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTurnLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create turn log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create turn log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let Value::Object(mut map) = payload {
            map.insert("type".to_string(), Value::String(event_type.to_string()));
            map.insert("timestamp".to_string(), Value::String(timestamp));
            Value::Object(map)
        } else {
            json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": payload,
            })
        };

        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not serialize {} event: {}", event_type, e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
                warn!("Could not write to turn log {}: {}", self.path.display(), e);
            }
        }
    }
}

impl TurnRecordEmitter for JsonlTurnLogger {
    fn emit(&self, record: &TurnRecord) {
        match serde_json::to_value(record) {
            Ok(value) => self.write("turn", value),
            Err(e) => warn!("Could not serialize turn {}: {}", record.turn, e),
        }
    }

    fn session_start(&self, session_id: &str, persona: &Persona) {
        self.write(
            "session_start",
            json!({
                "session_id": session_id,
                "persona": persona,
            }),
        );
    }

    fn session_end(&self, state: &SessionState) {
        self.write(
            "session_end",
            json!({
                "session_id": state.id,
                "status": state.status,
                "termination": state.termination,
                "turns": state.turns.len(),
            }),
        );
    }
}

impl Drop for JsonlTurnLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
