// definition.rs — A fully validated check registration.
//
// Built once by the loader, immutable for the process lifetime. The
// matcher is already parsed; nothing at dispatch time can fail to parse.

use std::time::Duration;

use tw_event::{Stage, ToolCallEvent};
use tw_matcher::Expr;
use tw_runner::FailureMode;

/// One registered check: when it runs, whether it applies, what to execute.
#[derive(Debug, Clone)]
pub struct CheckDefinition {
    /// Diagnostic name, used in synthesized messages and logs.
    pub name: String,

    /// Which interception stage this check runs at.
    pub stage: Stage,

    /// Parsed matcher deciding whether the check applies to an event.
    pub matcher: Expr,

    /// The matcher's source text, kept for display and diagnostics.
    pub matcher_source: String,

    /// Program and arguments, argv style.
    pub command: Vec<String>,

    /// Per-invocation deadline.
    pub timeout: Duration,

    /// What the verdict becomes if the check itself fails.
    pub on_failure: FailureMode,

    /// Execution rank within the stage. Lower runs first; ties keep
    /// declaration order.
    pub order: i64,
}

impl CheckDefinition {
    /// Whether this check runs for the given event: the stage must match
    /// and the matcher must accept the event.
    pub fn applies_to(&self, event: &ToolCallEvent) -> bool {
        self.stage == event.stage && self.matcher.matches(event)
    }
}
