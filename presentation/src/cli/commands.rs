//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the session report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every turn with committee, validation and execution details
    Full,
    /// Status line and one line per turn
    Summary,
    /// The report as JSON
    Json,
}

/// CLI arguments for persona-probe
#[derive(Parser, Debug)]
#[command(name = "persona-probe")]
#[command(author, version, about = "Committee-driven exploratory testing as a synthetic persona")]
#[command(long_about = r#"
Persona Probe drives a system under test on behalf of a synthetic persona.

Every turn runs three steps:
1. Committee: each proposal source proposes an action, sees its peers'
   proposals, may revise, and the committee votes
2. Validation: the winning action passes schema, goal and safety checks
3. Execution: the action is applied and the new observation recorded

Configuration files are loaded from (in priority order):
1. PROBE_* environment variables (e.g. PROBE_COMMITTEE__SEED=7)
2. --config <path>     Explicit config file
3. ./probe.toml        Project-level config
4. ~/.config/persona-probe/config.toml   Global config

Example:
  persona-probe --persona personas/shopper.toml
  persona-probe --persona personas/red-team.toml --safety-profile strict -o json
  persona-probe --scenario scenarios/checkout.toml --max-turns 5 --seed 7
"#)]
pub struct Cli {
    /// Persona file (TOML); a generic tester is used when omitted
    #[arg(short, long, value_name = "PATH")]
    pub persona: Option<PathBuf>,

    /// Scenario file (TOML) with the initial observation and turn limit
    #[arg(short, long, value_name = "PATH")]
    pub scenario: Option<PathBuf>,

    /// Maximum number of executed turns
    #[arg(long, value_name = "N")]
    pub max_turns: Option<u32>,

    /// Seed for committee tie-breaking
    #[arg(long)]
    pub seed: Option<u64>,

    /// Safety profile: strict, balanced, neutral or auto
    #[arg(long, value_name = "PROFILE")]
    pub safety_profile: Option<String>,

    /// Number of committee members
    #[arg(long, value_name = "N")]
    pub committee_size: Option<usize>,

    /// Write turn records as JSONL to this path
    #[arg(long, value_name = "PATH")]
    pub turn_log: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
