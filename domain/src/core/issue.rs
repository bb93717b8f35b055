//! Configuration issue reporting.
//!
//! Configuration is validated up front and problems are returned as
//! structured [`ConfigIssue`]s with a severity, so callers can print every
//! warning and refuse to start only when an [`Severity::Error`] is present.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The committee would have no proposal sources.
    EmptyCommittee,
    /// `max_turns` is zero, so no turn could ever run.
    ZeroMaxTurns,
    /// A numeric value is outside its allowed range.
    OutOfRange { field: String },
    /// An enum-like string could not be parsed.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A source definition is missing a required field.
    IncompleteSource { index: usize, field: String },
    /// A setting required by another setting is absent.
    MissingField { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check whether any of `issues` is fatal.
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_ignores_warnings() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "committee.min_agreement".into(),
            },
            "too high",
        )];
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_detects_error() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::EmptyCommittee, "w"),
            ConfigIssue::error(ConfigIssueCode::ZeroMaxTurns, "e"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_empty() {
        assert!(!ConfigIssue::has_errors(&[]));
    }
}
