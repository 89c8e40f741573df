// output.rs — The structured message a check may print on stdout.
//
// Output is optional: silence is valid, and the exit status alone then
// determines the verdict. Unknown fields are tolerated so checks can carry
// their own diagnostics.

use serde::Deserialize;

/// A check's stdout payload. All fields optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckOutput {
    /// Explicit block request. Can only escalate the exit-status decision,
    /// never downgrade it.
    #[serde(default)]
    pub block: Option<bool>,

    /// Operator-facing explanation.
    #[serde(default)]
    pub message: Option<String>,

    /// Agent-facing note.
    #[serde(default)]
    pub feedback: Option<String>,

    /// `false` asks the host to stop — treated like an explicit block.
    #[serde(default, rename = "continue")]
    pub continue_: Option<bool>,
}

impl CheckOutput {
    /// Parse a check's stdout, if it printed anything parseable.
    ///
    /// Returns `None` both for empty output and for output that is not a
    /// JSON object; the caller logs the latter and falls back to the exit
    /// status — unparseable output is a check bug, not a reason to fault
    /// the dispatch.
    pub fn parse(check_name: &str, stdout: &str) -> Option<Self> {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str(trimmed) {
            Ok(output) => Some(output),
            Err(err) => {
                tracing::warn!(
                    check = check_name,
                    error = %err,
                    "check produced unparseable output; using exit status only"
                );
                None
            }
        }
    }

    /// Whether this output escalates the verdict to a block regardless of
    /// exit status.
    pub fn requests_block(&self) -> bool {
        self.block == Some(true) || self.continue_ == Some(false)
    }
}
