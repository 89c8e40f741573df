// dispatch.rs — Run one event through the pipeline.
//
// Reads the event JSON from stdin, prints the DispatchResult as JSON on
// stdout, and mirrors the decision in the process exit code (0 allow,
// 1 warn, 2 block) so `twarden dispatch` can itself sit behind a
// hook-style integration.

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use tw_config::{PolicySnapshot, WardenPaths};
use tw_dispatch::Dispatcher;
use tw_event::{Decision, ToolCallEvent};
use tw_journal::DecisionJournal;

pub fn execute(paths: &WardenPaths, journal: bool) -> anyhow::Result<ExitCode> {
    let snapshot = PolicySnapshot::load(&paths.policy)
        .with_context(|| format!("loading policy from {}", paths.policy.display()))?;

    let mut dispatcher = Dispatcher::new(Arc::new(snapshot));
    if journal {
        let journal = DecisionJournal::open(&paths.journal)
            .with_context(|| format!("opening journal at {}", paths.journal.display()))?;
        dispatcher = dispatcher.with_journal(journal);
    }

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading event from stdin")?;
    let event: ToolCallEvent = serde_json::from_str(&input).context("parsing event JSON")?;

    let result = dispatcher.intercept(&event);
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(match result.decision {
        Decision::Allow => ExitCode::SUCCESS,
        Decision::Warn => ExitCode::from(1),
        Decision::Block => ExitCode::from(2),
    })
}
