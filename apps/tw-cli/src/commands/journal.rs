// journal.rs — Journal subcommands: tail.

use std::process::ExitCode;

use clap::Subcommand;
use tw_config::WardenPaths;
use tw_journal::DecisionJournal;

#[derive(Subcommand)]
pub enum JournalCommands {
    /// Show recent decision records.
    Tail {
        /// Number of records to show.
        #[arg(short, default_value = "20")]
        n: usize,
    },
}

pub fn execute(cmd: &JournalCommands, paths: &WardenPaths) -> anyhow::Result<ExitCode> {
    match cmd {
        JournalCommands::Tail { n } => {
            if !paths.journal.exists() {
                println!("No journal found at {}", paths.journal.display());
                return Ok(ExitCode::SUCCESS);
            }

            let records = DecisionJournal::tail(&paths.journal, *n)?;
            if records.is_empty() {
                println!("No decisions recorded.");
                return Ok(ExitCode::SUCCESS);
            }

            println!(
                "{:<20} {:<7} {:<12} {:<10} MESSAGES",
                "TIMESTAMP", "RESULT", "STAGE", "TOOL"
            );
            println!("{}", "-".repeat(80));

            for record in records {
                println!(
                    "{:<20} {:<7} {:<12} {:<10} {}",
                    record.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    record.decision,
                    record.stage,
                    record.tool,
                    record.messages.join(" | "),
                );
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
