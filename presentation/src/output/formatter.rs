//! Output formatter trait

use probe_application::SessionReport;

/// Trait for formatting session reports
pub trait OutputFormatter {
    /// Every turn in detail
    fn format(&self, report: &SessionReport) -> String;

    fn format_json(&self, report: &SessionReport) -> String;

    /// One line per turn (concise output)
    fn format_summary(&self, report: &SessionReport) -> String;
}
