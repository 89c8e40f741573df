// record.rs — One journal line: a dispatch and its outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tw_event::{Decision, DispatchResult, Stage, ToolCallEvent};
use uuid::Uuid;

/// What one invoked check decided, in invocation order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: String,
    pub decision: Decision,
}

/// One dispatch, as recorded in the journal.
///
/// Input parameters are deliberately not recorded — events can carry file
/// contents and command lines the operator may not want persisted. The
/// tool name plus per-check outcomes is enough to reconstruct what policy
/// did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub record_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub tool: String,
    pub stage: Stage,
    pub decision: Decision,
    /// Operator-facing messages from the dispatch.
    pub messages: Vec<String>,
    /// Which checks ran and what each decided. A short-circuited dispatch
    /// lists only the checks actually invoked.
    pub checks: Vec<CheckOutcome>,
}

impl DecisionRecord {
    /// Build a record from a finished dispatch.
    pub fn from_dispatch(
        event: &ToolCallEvent,
        result: &DispatchResult,
        checks: Vec<CheckOutcome>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            tool: event.tool.clone(),
            stage: event.stage,
            decision: result.decision,
            messages: result.messages.clone(),
            checks,
        }
    }
}
