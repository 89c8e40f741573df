// dispatcher.rs — The host-facing entry point.
//
// One Dispatcher per policy snapshot. `intercept` is synchronous and may
// be called from multiple threads: the snapshot is Arc-shared and
// read-only, each call gets its own pipeline run, and the journal (the
// only shared mutable state) sits behind a mutex with a single append per
// dispatch.
//
// The dispatcher decides; the caller enforces. Actually suppressing a
// blocked operation is the host runtime's job.

use std::sync::{Arc, Mutex};

use tw_config::PolicySnapshot;
use tw_event::{DispatchResult, ToolCallEvent};
use tw_journal::{DecisionJournal, DecisionRecord};
use tw_runner::CheckRunner;

use crate::pipeline;

/// Routes intercepted events through the stage pipeline.
pub struct Dispatcher {
    snapshot: Arc<PolicySnapshot>,
    runner: CheckRunner,
    journal: Option<Mutex<DecisionJournal>>,
}

impl Dispatcher {
    pub fn new(snapshot: Arc<PolicySnapshot>) -> Self {
        Self {
            snapshot,
            runner: CheckRunner::new(),
            journal: None,
        }
    }

    /// Attach a decision journal. Journaling failures are logged and never
    /// affect the decision — a full disk must not become a policy bypass
    /// or an outage.
    pub fn with_journal(mut self, journal: DecisionJournal) -> Self {
        self.journal = Some(Mutex::new(journal));
        self
    }

    pub fn snapshot(&self) -> &PolicySnapshot {
        &self.snapshot
    }

    /// Mediate one intercepted operation.
    ///
    /// The event's stage selects which checks run. Returns the aggregated
    /// decision; never panics, never hangs past the sum of configured
    /// check timeouts.
    pub fn intercept(&self, event: &ToolCallEvent) -> DispatchResult {
        let outcome = pipeline::run_stage(&self.snapshot, &self.runner, event);

        tracing::info!(
            tool = %event.tool,
            stage = %event.stage,
            decision = %outcome.result.decision,
            checks = outcome.invoked.len(),
            "dispatch complete"
        );

        if let Some(journal) = &self.journal {
            let record = DecisionRecord::from_dispatch(event, &outcome.result, outcome.invoked);
            match journal.lock() {
                Ok(mut guard) => {
                    if let Err(error) = guard.append(&record) {
                        tracing::warn!(error = %error, "failed to journal dispatch");
                    }
                }
                Err(_) => tracing::warn!("journal mutex poisoned; dispatch not recorded"),
            }
        }

        outcome.result
    }
}
