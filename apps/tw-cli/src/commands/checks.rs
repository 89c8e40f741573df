// checks.rs — List registered checks; optionally match them against an
// event to see which would fire.

use std::process::ExitCode;

use anyhow::Context;
use tw_config::{PolicySnapshot, WardenPaths};
use tw_event::ToolCallEvent;

pub fn execute(paths: &WardenPaths, event_json: Option<&str>) -> anyhow::Result<ExitCode> {
    let snapshot = PolicySnapshot::load(&paths.policy)
        .with_context(|| format!("loading policy from {}", paths.policy.display()))?;

    if snapshot.is_empty() {
        println!("No checks registered.");
        return Ok(ExitCode::SUCCESS);
    }

    let event = event_json
        .map(|json| serde_json::from_str::<ToolCallEvent>(json).context("parsing event JSON"))
        .transpose()?;

    println!(
        "{:<1} {:<12} {:<20} {:<9} MATCHER",
        "", "STAGE", "NAME", "TIMEOUT"
    );
    println!("{}", "-".repeat(80));

    for check in snapshot.checks() {
        let marker = match &event {
            Some(event) if check.applies_to(event) => "*",
            _ => " ",
        };
        println!(
            "{:<1} {:<12} {:<20} {:<9} {}",
            marker,
            check.stage,
            check.name,
            format!("{}ms", check.timeout.as_millis()),
            check.matcher_source
        );
    }

    if event.is_some() {
        println!();
        println!("* = would run for the given event");
    }

    Ok(ExitCode::SUCCESS)
}
