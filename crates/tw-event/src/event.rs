// event.rs — Intercepted tool-call events.
//
// A ToolCallEvent is the unit of work for the whole pipeline: one snapshot
// of what the agent is about to do (or just did), created by the host
// runtime and read-only from then on. Its serde form is also the wire
// format delivered to each check's stdin, so field names here are a
// contract with externally-written checks.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// When checks run relative to the operation's real execution.
///
/// `Before` checks guard operations that have not happened yet; `After`
/// checks react to completed operations; `SessionEnd` checks run once when
/// the agent session terminates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Before,
    After,
    SessionEnd,
}

impl Stage {
    /// The snake_case name used in config files and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Before => "before",
            Stage::After => "after",
            Stage::SessionEnd => "session_end",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An intercepted operation, e.g. an `Edit` with a `file_path` and
/// `new_string`, or a `Bash` with a `command` string.
///
/// The event carries its lifecycle stage so the dispatcher can select the
/// right pipeline without a second argument: the host knows whether the
/// operation is about to happen or just happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallEvent {
    /// The kind of operation (e.g. "Edit", "Write", "Bash").
    pub tool: String,

    /// Named parameters of the operation (e.g. `file_path`, `old_string`,
    /// `new_string`, `command`). Arbitrary JSON values are allowed.
    #[serde(default)]
    pub input: Map<String, Value>,

    /// Where in the operation lifecycle this event was intercepted.
    pub stage: Stage,
}

impl ToolCallEvent {
    /// Create an event with an empty input map.
    pub fn new(tool: impl Into<String>, stage: Stage) -> Self {
        Self {
            tool: tool.into(),
            input: Map::new(),
            stage,
        }
    }

    /// Add one input parameter and return self (builder pattern).
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.input.insert(key.into(), value.into());
        self
    }

    /// Look up an input parameter as a string slice.
    ///
    /// Returns `None` for missing keys and for non-string values; use
    /// [`input_text`](Self::input_text) when non-string values should
    /// still compare as text.
    pub fn input_str(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(Value::as_str)
    }

    /// Look up an input parameter as text.
    ///
    /// Strings are returned as-is; other JSON values are rendered in their
    /// canonical JSON form (`true`, `42`, `["a"]`), so matchers can still
    /// compare against them.
    pub fn input_text(&self, key: &str) -> Option<String> {
        match self.input.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::SessionEnd).unwrap(),
            "\"session_end\""
        );
        assert_eq!(serde_json::to_string(&Stage::Before).unwrap(), "\"before\"");
    }

    #[test]
    fn event_round_trip() {
        let event = ToolCallEvent::new("Edit", Stage::Before)
            .with_input("file_path", "src/main.rs")
            .with_input("new_string", "fn main() {}");

        let json = serde_json::to_string(&event).unwrap();
        let restored: ToolCallEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.tool, "Edit");
        assert_eq!(restored.stage, Stage::Before);
        assert_eq!(restored.input_str("file_path"), Some("src/main.rs"));
    }

    #[test]
    fn wire_format_field_names() {
        // The serialized shape is the stdin contract for checks — the field
        // names must stay exactly "tool", "input", "stage".
        let event = ToolCallEvent::new("Bash", Stage::Before).with_input("command", "ls");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["tool"], "Bash");
        assert_eq!(value["stage"], "before");
        assert_eq!(value["input"]["command"], "ls");
    }

    #[test]
    fn input_missing_from_wire_defaults_to_empty() {
        let event: ToolCallEvent =
            serde_json::from_str(r#"{"tool": "Stop", "stage": "session_end"}"#).unwrap();
        assert!(event.input.is_empty());
    }

    #[test]
    fn input_text_renders_non_strings() {
        let event = ToolCallEvent::new("Edit", Stage::Before)
            .with_input("line", 42)
            .with_input("create", true);
        assert_eq!(event.input_text("line").as_deref(), Some("42"));
        assert_eq!(event.input_text("create").as_deref(), Some("true"));
        assert_eq!(event.input_str("line"), None);
        assert_eq!(event.input_text("absent"), None);
    }
}
