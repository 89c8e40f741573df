// validate.rs — Load the policy and report what's registered.
//
// A valid policy prints every check grouped by stage; an invalid one
// prints the loader's error and exits non-zero. This is the command to
// run after editing policy.toml.

use std::process::ExitCode;

use tw_config::{PolicySnapshot, WardenPaths};
use tw_event::Stage;

pub fn execute(paths: &WardenPaths) -> anyhow::Result<ExitCode> {
    let snapshot = match PolicySnapshot::load(&paths.policy) {
        Ok(snapshot) => snapshot,
        Err(error) => {
            eprintln!("policy invalid: {}", error);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!(
        "policy OK: {} check(s) in {}",
        snapshot.len(),
        paths.policy.display()
    );

    for stage in [Stage::Before, Stage::After, Stage::SessionEnd] {
        let checks: Vec<_> = snapshot.for_stage(stage).collect();
        if checks.is_empty() {
            continue;
        }
        println!();
        println!("{}:", stage);
        for check in checks {
            println!(
                "  [{:>4}] {:<20} {:<9} {}",
                check.order,
                check.name,
                format!("{:?}", check.on_failure).to_lowercase(),
                check.matcher_source
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
