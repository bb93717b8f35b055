//! CLI entrypoint for Persona Probe
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use probe_application::{
    NoEmitter, NoProgress, ProgressNotifier, RunSessionInput, RunSessionUseCase, SessionReport,
    TurnRecordEmitter,
};
use probe_domain::{ConfigIssue, SessionStatus, Severity};
use probe_infrastructure::{
    ConfigLoader, FileConfig, JsonlTurnLogger, PersonaLoader, Scenario, ScenarioLoader,
    build_executor, build_sources,
};
use probe_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Held until exit so buffered file logs are flushed
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting Persona Probe");

    // === Configuration ===
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let scenario = match &cli.scenario {
        Some(path) => Some(ScenarioLoader::load(path)?),
        None => None,
    };
    apply_overrides(&mut config, &cli, scenario.as_ref());

    let issues = config.validate();
    report_issues(&issues);
    if ConfigIssue::has_errors(&issues) {
        bail!("Configuration has errors; fix them and try again");
    }

    let persona = match &cli.persona {
        Some(path) => PersonaLoader::load(path)?,
        None => PersonaLoader::default_persona(),
    };

    // === Dependency Injection ===
    let sources = build_sources(&config.sources, config.committee.size)?;
    let executor = build_executor(&config.executor)?;
    let emitter: Arc<dyn TurnRecordEmitter> = match cli
        .turn_log
        .clone()
        .or_else(|| config.logging.turn_log.clone().map(Into::into))
    {
        Some(path) => match JsonlTurnLogger::new(&path) {
            Some(logger) => {
                info!("Writing turn records to {}", path.display());
                Arc::new(logger)
            }
            None => {
                warn!("Turn log disabled: could not open {}", path.display());
                Arc::new(NoEmitter)
            }
        },
        None => Arc::new(NoEmitter),
    };

    let cancellation = CancellationToken::new();
    let use_case = RunSessionUseCase::new(sources, executor, emitter, config.to_session_config())?
        .with_cancellation(cancellation.clone());

    // Ctrl-C stops the session before the next turn starts
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted; finishing the current turn");
                cancellation.cancel();
            }
        }
    });

    let mut input = RunSessionInput::new(persona);
    if let Some(observation) = scenario.and_then(|s| s.initial_observation) {
        input = input.with_initial_observation(observation);
    }

    if !cli.quiet && cli.output != OutputFormat::Json {
        println!();
        println!("+============================================================+");
        println!("|           Persona Probe - Committee Session                |");
        println!("+============================================================+");
        println!();
        println!("Persona: {}", input.persona.name);
        println!("Committee: {}", use_case.committee().source_ids().join(", "));
        println!();
    }

    // Execute with or without progress reporting
    let progress: Box<dyn ProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let report = use_case
        .execute_with_progress(input, progress.as_ref())
        .await
        .context("Session could not start")?;

    println!("{}", render(&report, cli.output));

    Ok(match report.status {
        SessionStatus::Completed => ExitCode::SUCCESS,
        SessionStatus::Aborted => ExitCode::from(130),
        _ => ExitCode::FAILURE,
    })
}

/// Verbosity picks the default level; `RUST_LOG` overrides it.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = match &cli.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let appender = tracing_appender::rolling::daily(dir, "persona-probe.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

/// CLI flags beat the scenario, which beats the config files.
fn apply_overrides(config: &mut FileConfig, cli: &Cli, scenario: Option<&Scenario>) {
    if let Some(max_turns) = scenario.and_then(|s| s.max_turns) {
        config.session.max_turns = max_turns;
    }
    if let Some(max_turns) = cli.max_turns {
        config.session.max_turns = max_turns;
    }
    if let Some(seed) = cli.seed {
        config.committee.seed = seed;
    }
    if let Some(size) = cli.committee_size {
        config.committee.size = size;
    }
    if let Some(profile) = &cli.safety_profile {
        config.validation.safety_profile = profile.clone();
    }
}

fn report_issues(issues: &[ConfigIssue]) {
    for issue in issues {
        match issue.severity {
            Severity::Error => eprintln!("{} {}", "error:".red().bold(), issue.message),
            Severity::Warning => eprintln!("{} {}", "warning:".yellow().bold(), issue.message),
        }
    }
}

fn render(report: &SessionReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Full => ConsoleFormatter::format(report),
        OutputFormat::Summary => ConsoleFormatter::format_summary(report),
        OutputFormat::Json => ConsoleFormatter::format_json(report),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_priority() {
        let mut config = FileConfig::default();
        let cli = Cli::parse_from(["persona-probe", "--seed", "7", "--max-turns", "3"]);
        let scenario = Scenario {
            max_turns: Some(8),
            ..Default::default()
        };
        apply_overrides(&mut config, &cli, Some(&scenario));
        assert_eq!(config.session.max_turns, 3);
        assert_eq!(config.committee.seed, 7);

        let mut config = FileConfig::default();
        let cli = Cli::parse_from(["persona-probe", "--safety-profile", "auto"]);
        apply_overrides(&mut config, &cli, Some(&scenario));
        assert_eq!(config.session.max_turns, 8);
        assert_eq!(config.validation.safety_profile, "auto");
    }
}
