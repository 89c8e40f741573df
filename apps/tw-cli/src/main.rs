//! # tw-cli
//!
//! Command-line interface for Toolwarden.
//!
//! Operates a project's mediation policy from the terminal:
//! - `twarden validate` — load the policy file and report every
//!   registered check or the precise configuration error
//! - `twarden dispatch` — read one event JSON from stdin, run the
//!   pipeline, print the decision (exit 0 allow / 1 warn / 2 block)
//! - `twarden checks` — list registered checks, optionally showing which
//!   would match a given event
//! - `twarden journal tail` — show recent decision records

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tw_config::WardenPaths;

/// Toolwarden CLI — validate and exercise tool-call mediation policies.
#[derive(Parser)]
#[command(name = "twarden", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Policy file (defaults to <project-root>/.warden/policy.toml).
    #[arg(long)]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the policy file and list registered checks.
    Validate,
    /// Dispatch one event (JSON on stdin) through the pipeline.
    Dispatch {
        /// Append the decision to the journal.
        #[arg(long)]
        journal: bool,
    },
    /// List registered checks per stage.
    Checks {
        /// Event JSON to match against; matching checks are marked.
        #[arg(long)]
        event: Option<String>,
    },
    /// Inspect the decision journal.
    Journal {
        #[command(subcommand)]
        command: commands::journal::JournalCommands,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout is reserved for command output (dispatch
    // prints the result JSON there).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let mut paths = WardenPaths::for_project(&project_root);
    if let Some(policy) = &cli.policy {
        paths.policy = policy.clone();
    }

    match &cli.command {
        Commands::Validate => commands::validate::execute(&paths),
        Commands::Dispatch { journal } => commands::dispatch::execute(&paths, *journal),
        Commands::Checks { event } => commands::checks::execute(&paths, event.as_deref()),
        Commands::Journal { command } => commands::journal::execute(command, &paths),
    }
}
