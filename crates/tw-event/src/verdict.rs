// verdict.rs — Check verdicts and the aggregated dispatch result.
//
// A Verdict is what one check invocation produced; a DispatchResult is what
// the whole pipeline hands back to the host. A Block or Warn verdict is the
// system working correctly — data, not an error.
//
// Message routing: `message` strings are operator-facing, `feedback`
// strings are returned for injection into the agent's own context. The two
// travel separately all the way to the host.

use serde::{Deserialize, Serialize};

/// The outcome of a check, or of a whole dispatch.
///
/// Variant order matters: `derive(Ord)` gives `Allow < Warn < Block`, which
/// is the aggregation rule — the final decision is the maximum over all
/// verdicts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The operation proceeds.
    Allow,
    /// The operation proceeds, but the message must be surfaced.
    Warn,
    /// The operation must not be performed.
    Block,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Warn => "warn",
            Decision::Block => "block",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One check invocation's outcome. Never persisted beyond the current
/// dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verdict {
    pub decision: Decision,
    /// Operator-facing explanation. Mandatory for `Block` — the runner
    /// synthesizes one if the check omitted it.
    pub message: Option<String>,
    /// Agent-facing note (e.g. "auto-formatted file"), valid on any
    /// decision including `Allow`.
    pub feedback: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            message: None,
            feedback: None,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            decision: Decision::Warn,
            message: Some(message.into()),
            feedback: None,
        }
    }

    pub fn block(message: impl Into<String>) -> Self {
        Self {
            decision: Decision::Block,
            message: Some(message.into()),
            feedback: None,
        }
    }

    /// Set the agent-facing feedback and return self.
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

/// The aggregated outcome of one dispatch, built incrementally by the
/// stage pipeline.
///
/// The caller is responsible for honoring `Block` (not performing the
/// operation), showing `messages` to the operator, and feeding `feedback`
/// back to the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResult {
    pub decision: Decision,
    /// Operator-facing messages from non-Allow verdicts, in check order.
    pub messages: Vec<String>,
    /// Agent-facing feedback from any verdict, in check order.
    pub feedback: Vec<String>,
}

impl DispatchResult {
    /// The default-allow result: no matching checks, nothing to report.
    pub fn allow() -> Self {
        Self {
            decision: Decision::Allow,
            messages: Vec::new(),
            feedback: Vec::new(),
        }
    }

    /// Fold one verdict into the running aggregate.
    ///
    /// Severity only ever escalates; messages and feedback append in
    /// arrival order so the output is deterministic for a fixed check
    /// sequence.
    pub fn absorb(&mut self, verdict: &Verdict) {
        self.decision = self.decision.max(verdict.decision);
        if verdict.decision != Decision::Allow {
            if let Some(message) = &verdict.message {
                self.messages.push(message.clone());
            }
        }
        if let Some(feedback) = &verdict.feedback {
            self.feedback.push(feedback.clone());
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.decision == Decision::Block
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_severity_order() {
        assert!(Decision::Block > Decision::Warn);
        assert!(Decision::Warn > Decision::Allow);
        assert_eq!(Decision::Warn.max(Decision::Block), Decision::Block);
    }

    #[test]
    fn absorb_escalates_and_collects() {
        let mut result = DispatchResult::allow();
        result.absorb(&Verdict::allow().with_feedback("formatted"));
        assert_eq!(result.decision, Decision::Allow);
        assert!(result.messages.is_empty());
        assert_eq!(result.feedback, vec!["formatted"]);

        result.absorb(&Verdict::warn("unresolved TODO"));
        assert_eq!(result.decision, Decision::Warn);
        assert_eq!(result.messages, vec!["unresolved TODO"]);

        result.absorb(&Verdict::block("secret file"));
        assert_eq!(result.decision, Decision::Block);
        assert_eq!(result.messages, vec!["unresolved TODO", "secret file"]);
    }

    #[test]
    fn absorb_never_downgrades() {
        let mut result = DispatchResult::allow();
        result.absorb(&Verdict::block("no"));
        result.absorb(&Verdict::allow());
        assert!(result.is_blocked());
    }

    #[test]
    fn allow_message_is_not_collected() {
        // Allow verdicts may carry a message field on the wire; only Warn
        // and Block messages are operator-visible.
        let mut result = DispatchResult::allow();
        let verdict = Verdict {
            decision: Decision::Allow,
            message: Some("noise".to_string()),
            feedback: None,
        };
        result.absorb(&verdict);
        assert!(result.messages.is_empty());
    }

    #[test]
    fn decision_serializes_as_snake_case() {
        assert_eq!(serde_json::to_string(&Decision::Block).unwrap(), "\"block\"");
    }
}
