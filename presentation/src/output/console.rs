//! Console output formatter for session reports

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use probe_application::SessionReport;
use probe_domain::{SessionStatus, TurnRecord};

/// Formats session reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report, one section per turn
    pub fn format(report: &SessionReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Persona Probe Session"));
        output.push('\n');
        output.push_str(&Self::overview(report));

        for record in &report.turns {
            output.push_str(&Self::section_header(&format!("Turn {}", record.turn)));
            output.push_str(&Self::turn_detail(record));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &SessionReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Status and one line per turn
    pub fn format_summary(report: &SessionReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Persona Probe Result ===".cyan().bold()
        ));
        output.push_str(&Self::overview(report));

        for record in &report.turns {
            output.push_str(&format!("  {}\n", Self::turn_line(record)));
        }

        output
    }

    fn overview(report: &SessionReport) -> String {
        let termination = report
            .termination
            .map(|t| format!(" ({})", t))
            .unwrap_or_default();
        format!(
            "{} {}\n{} {}\n{} {}{}\n{} {}/{}  {} {}\n\n",
            "Session:".cyan().bold(),
            report.session_id,
            "Persona:".cyan().bold(),
            report.persona,
            "Status:".cyan().bold(),
            Self::status_label(report.status),
            termination,
            "Turns:".cyan().bold(),
            report.turns_executed,
            report.max_turns,
            "Safety:".cyan().bold(),
            report.safety_profile,
        )
    }

    fn status_label(status: SessionStatus) -> String {
        match status {
            SessionStatus::Completed => status.to_string().green().bold().to_string(),
            SessionStatus::Failed => status.to_string().red().bold().to_string(),
            SessionStatus::Aborted => status.to_string().yellow().bold().to_string(),
            _ => status.to_string(),
        }
    }

    fn turn_line(record: &TurnRecord) -> String {
        let action = record
            .action()
            .map(|a| a.to_string())
            .unwrap_or_else(|| "(no action)".to_string());
        match &record.failure {
            Some(failure) => format!("{} {:>2}. {}  {}", "x".red(), record.turn, action, failure),
            None => {
                let mut line = format!("{} {:>2}. {}", "v".green(), record.turn, action);
                if let Some(consensus) = &record.consensus {
                    line.push_str(&format!(
                        "  {} {:.0}%",
                        consensus.vote_summary(),
                        consensus.agreement * 100.0
                    ));
                }
                if record.refusal.is_some_and(|r| r.is_refused()) {
                    line.push_str(&format!("  {}", "refused".yellow()));
                }
                line
            }
        }
    }

    fn turn_detail(record: &TurnRecord) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Observation:".bold(),
            probe_domain::core::string::truncate(&record.observation, 200)
        ));

        if let Some(consensus) = &record.consensus {
            output.push_str(&format!("\n{}\n", "Proposals:".yellow().bold()));
            for proposal in &consensus.proposals {
                let mut marks = String::new();
                if proposal.changed {
                    marks.push_str(" (changed)");
                }
                if proposal.fallback {
                    marks.push_str(" (fallback)");
                }
                output.push_str(&format!(
                    "  {} {:<16} {} @ {:.2}{}\n",
                    format!("R{}", proposal.round.number()).dimmed(),
                    proposal.source_id,
                    proposal.action,
                    proposal.confidence,
                    marks.dimmed()
                ));
            }
            if !consensus.abstained.is_empty() {
                output.push_str(&format!(
                    "  {} {}\n",
                    "Abstained:".dimmed(),
                    consensus.abstained.join(", ")
                ));
            }
            let agreement = format!("{:.0}%", consensus.agreement * 100.0);
            output.push_str(&format!(
                "{} {}  agreement {}  score {:.2}\n",
                "Decision:".green().bold(),
                consensus.action,
                if consensus.low_agreement {
                    agreement.yellow().to_string()
                } else {
                    agreement
                },
                consensus.score
            ));
        }

        if let Some(validation) = &record.validation {
            let checks: Vec<String> = validation
                .results
                .iter()
                .map(|r| {
                    if r.passed {
                        format!("{} {}", "v".green(), r.check)
                    } else {
                        format!("{} {}", "x".red(), r.check)
                    }
                })
                .collect();
            output.push_str(&format!("{} {}\n", "Checks:".bold(), checks.join("  ")));
            for soft in &validation.soft_failures {
                output.push_str(&format!("  {} {}\n", "!".yellow(), soft));
            }
            for advisory in &validation.advisories {
                output.push_str(&format!("  {} {}\n", "i".cyan(), advisory));
            }
        }

        if let Some(execution) = &record.execution {
            output.push_str(&format!(
                "{} {} {}\n",
                "Result:".bold(),
                probe_domain::core::string::truncate(&execution.observation, 200),
                format!("({:.2}s)", execution.latency_secs).dimmed()
            ));
        }

        if let Some(refusal) = record.refusal {
            let label = if refusal.is_refused() {
                "refused".green()
            } else {
                "not refused".red()
            };
            output.push_str(&format!("{} {}\n", "Refusal:".bold(), label));
        }

        if let Some(failure) = &record.failure {
            output.push_str(&format!("{} {}\n", "Failure:".red().bold(), failure));
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &SessionReport) -> String {
        Self::format(report)
    }

    fn format_json(&self, report: &SessionReport) -> String {
        Self::format_json(report)
    }

    fn format_summary(&self, report: &SessionReport) -> String {
        Self::format_summary(report)
    }
}
