// pipeline.rs — Sequential check execution for one stage.
//
// One pipeline run per event: select the checks whose stage and matcher
// apply, walk them in execution order, fold each verdict into the running
// result, stop at the first Block. The snapshot is pre-sorted, so
// selection preserves order.

use tw_config::PolicySnapshot;
use tw_event::{Decision, DispatchResult, ToolCallEvent};
use tw_journal::CheckOutcome;
use tw_runner::CheckRunner;

/// The result of one stage execution, plus which checks actually ran —
/// the journal records the latter, and tests assert on it.
#[derive(Debug)]
pub struct StageOutcome {
    pub result: DispatchResult,
    /// Checks invoked, in invocation order. A short-circuited run lists
    /// only the checks that were reached.
    pub invoked: Vec<CheckOutcome>,
}

/// Run every applicable check for this event, in order, with
/// Block-short-circuit aggregation.
pub fn run_stage(
    snapshot: &PolicySnapshot,
    runner: &CheckRunner,
    event: &ToolCallEvent,
) -> StageOutcome {
    let mut result = DispatchResult::allow();
    let mut invoked = Vec::new();

    for check in snapshot.matching(event) {
        tracing::debug!(
            check = %check.name,
            stage = %event.stage,
            tool = %event.tool,
            "running check"
        );
        let verdict = runner.run(
            &check.name,
            &check.command,
            check.timeout,
            check.on_failure,
            event,
        );
        invoked.push(CheckOutcome {
            check: check.name.clone(),
            decision: verdict.decision,
        });
        result.absorb(&verdict);

        if verdict.decision == Decision::Block {
            tracing::info!(
                check = %check.name,
                tool = %event.tool,
                "check blocked the operation; skipping later checks"
            );
            break;
        }
    }

    StageOutcome { result, invoked }
}
