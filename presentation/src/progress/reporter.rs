//! Progress reporting for session execution

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use probe_application::ProgressNotifier;
use probe_domain::{ConsensusResult, ProposalRound, SessionState, TurnRecord, ValidationOutcome};
use std::sync::Mutex;

/// Reports progress with a session bar and one bar per committee round
pub struct ProgressReporter {
    multi: MultiProgress,
    session_bar: Mutex<Option<ProgressBar>>,
    round_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            session_bar: Mutex::new(None),
            round_bar: Mutex::new(None),
        }
    }

    fn session_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} turns {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {spinner:.green} {prefix:.bold} [{bar:20.green/white}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_display_name(round: ProposalRound) -> &'static str {
        match round {
            ProposalRound::Independent => "Round 1: Proposals",
            ProposalRound::Discussion => "Round 2: Discussion",
        }
    }

    fn with_session_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.session_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_session_start(&self, session_id: &str, max_turns: u32) {
        let pb = self.multi.add(ProgressBar::new(u64::from(max_turns)));
        pb.set_style(Self::session_style());
        pb.set_prefix(session_id.to_string());
        if let Ok(mut guard) = self.session_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_turn_start(&self, turn: u32) {
        self.with_session_bar(|pb| pb.set_message(format!("turn {}", turn)));
    }

    fn on_round_start(&self, round: ProposalRound, sources: usize) {
        let pb = self.multi.add(ProgressBar::new(sources as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(Self::round_display_name(round));
        if let Ok(mut guard) = self.round_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_source_complete(&self, _round: ProposalRound, source_id: &str, success: bool) {
        if let Ok(guard) = self.round_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), source_id)
            } else {
                format!("{} {}", "x".red(), source_id)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_round_complete(&self, _round: ProposalRound) {
        if let Ok(mut guard) = self.round_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_and_clear();
        }
    }

    fn on_consensus(&self, consensus: &ConsensusResult) {
        self.with_session_bar(|pb| {
            pb.set_message(format!(
                "{} ({:.0}%)",
                consensus.action,
                consensus.agreement * 100.0
            ))
        });
    }

    fn on_turn_complete(&self, record: &TurnRecord) {
        if record.is_success() {
            self.with_session_bar(|pb| pb.inc(1));
        }
    }

    fn on_session_end(&self, state: &SessionState) {
        if let Ok(mut guard) = self.session_bar.lock()
            && let Some(pb) = guard.take()
        {
            pb.finish_with_message(format!("{}", state.status.to_string().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_session_start(&self, session_id: &str, max_turns: u32) {
        println!(
            "{} {} (up to {} turns)",
            "->".cyan(),
            session_id.bold(),
            max_turns
        );
    }

    fn on_turn_start(&self, turn: u32) {
        println!("{} {}", "->".cyan(), format!("Turn {}", turn).bold());
    }

    fn on_source_complete(&self, round: ProposalRound, source_id: &str, success: bool) {
        if success {
            println!("  {} R{} {}", "v".green(), round.number(), source_id);
        } else {
            println!(
                "  {} R{} {} (abstained)",
                "x".red(),
                round.number(),
                source_id
            );
        }
    }

    fn on_consensus(&self, consensus: &ConsensusResult) {
        println!(
            "  {} {} ({:.0}% agreement)",
            "=".cyan(),
            consensus.action,
            consensus.agreement * 100.0
        );
    }

    fn on_validation(&self, outcome: &ValidationOutcome) {
        if let Some(failure) = &outcome.failure {
            println!("  {} blocked: {}", "x".red(), failure);
        }
        for soft in &outcome.soft_failures {
            println!("  {} {}", "!".yellow(), soft);
        }
    }

    fn on_session_end(&self, state: &SessionState) {
        println!("{} session {}", "->".cyan(), state.status);
    }
}
