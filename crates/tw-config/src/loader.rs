// loader.rs — policy.toml parsing and validation.
//
// The document is an ordered array of [[check]] tables plus top-level
// defaults:
//
//   timeout_ms = 10000
//
//   [[check]]
//   name = "block-secrets"
//   stage = "before"
//   matcher = 'tool in ["Edit", "Write"] and input.file_path contains ".env"'
//   command = ["python3", "checks/block-secrets.py"]
//   on_failure = "block"      # optional; "allow" only for after/session_end
//   timeout_ms = 5000         # optional; inherits the top-level default
//   order = 10                # optional; defaults to declaration index
//
// Loading validates everything up front. Equal `order` values within a
// stage are not an error: the stable sort keeps declaration position, so
// determinism is preserved.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tw_event::{Stage, ToolCallEvent};
use tw_runner::FailureMode;

use crate::definition::CheckDefinition;
use crate::error::ConfigError;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// The immutable, validated set of check definitions.
///
/// Safely shareable across concurrent dispatches (wrap in `Arc`); never
/// mutated after load.
#[derive(Debug, Clone)]
pub struct PolicySnapshot {
    checks: Vec<CheckDefinition>,
}

impl PolicySnapshot {
    /// Load and validate a policy file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::parse(&text)?;
        tracing::info!(
            policy = %path.display(),
            checks = snapshot.checks.len(),
            "policy loaded"
        );
        Ok(snapshot)
    }

    /// Parse and validate a policy document from memory.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawPolicy = toml::from_str(text)?;
        let default_timeout = raw.timeout_ms;

        let mut checks = Vec::with_capacity(raw.checks.len());
        for (index, entry) in raw.checks.into_iter().enumerate() {
            checks.push(validate_entry(entry, index, default_timeout)?);
        }

        // Stable sort: equal orders keep declaration position.
        checks.sort_by_key(|check| check.order);

        Ok(Self { checks })
    }

    /// An empty snapshot — every dispatch is default-allow.
    pub fn empty() -> Self {
        Self { checks: Vec::new() }
    }

    /// All checks, sorted by execution rank.
    pub fn checks(&self) -> &[CheckDefinition] {
        &self.checks
    }

    /// Checks registered for one stage, in execution order.
    pub fn for_stage(&self, stage: Stage) -> impl Iterator<Item = &CheckDefinition> {
        self.checks.iter().filter(move |check| check.stage == stage)
    }

    /// Checks that apply to this event (stage and matcher), in execution
    /// order.
    pub fn matching(&self, event: &ToolCallEvent) -> Vec<&CheckDefinition> {
        self.checks
            .iter()
            .filter(|check| check.applies_to(event))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }
}

/// Raw deserialization target for the TOML document. Unknown keys are
/// rejected — a typo'd key would silently disable part of the policy.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPolicy {
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
    #[serde(default, rename = "check")]
    checks: Vec<RawCheck>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCheck {
    name: Option<String>,
    stage: Stage,
    matcher: String,
    command: Vec<String>,
    timeout_ms: Option<u64>,
    on_failure: Option<FailureMode>,
    order: Option<i64>,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn validate_entry(
    entry: RawCheck,
    index: usize,
    default_timeout_ms: u64,
) -> Result<CheckDefinition, ConfigError> {
    let name = entry
        .name
        .clone()
        .unwrap_or_else(|| derived_name(&entry.command, index));

    if entry.command.is_empty() {
        return Err(ConfigError::EmptyCommand { check: name });
    }
    resolve_program(&name, &entry.command[0])?;

    let matcher =
        tw_matcher::parse(&entry.matcher).map_err(|source| ConfigError::InvalidMatcher {
            check: name.clone(),
            source,
        })?;

    let timeout_ms = entry.timeout_ms.unwrap_or(default_timeout_ms);
    if timeout_ms == 0 {
        return Err(ConfigError::ZeroTimeout { check: name });
    }

    let on_failure = entry.on_failure.unwrap_or_default();
    if on_failure == FailureMode::Allow && entry.stage == Stage::Before {
        return Err(ConfigError::FailOpenBeforeStage { check: name });
    }

    Ok(CheckDefinition {
        name,
        stage: entry.stage,
        matcher,
        matcher_source: entry.matcher.clone(),
        command: entry.command,
        timeout: Duration::from_millis(timeout_ms),
        on_failure,
        order: entry.order.unwrap_or(index as i64),
    })
}

/// Fallback diagnostic name: the program's basename, or the entry index
/// when even that is missing.
fn derived_name(command: &[String], index: usize) -> String {
    command
        .first()
        .map(|program| {
            Path::new(program)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| program.clone())
        })
        .unwrap_or_else(|| format!("check-{}", index))
}

/// Every referenced command must resolve to an executable entity at load
/// time. Bare names go through PATH lookup; anything with a path
/// separator is checked on disk directly.
fn resolve_program(check: &str, program: &str) -> Result<PathBuf, ConfigError> {
    if program.contains(std::path::MAIN_SEPARATOR) || program.contains('/') {
        let path = Path::new(program);
        if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(ConfigError::UnresolvableCommand {
                check: check.to_string(),
                program: program.to_string(),
                reason: "no such file".to_string(),
            })
        }
    } else {
        which::which(program).map_err(|err| ConfigError::UnresolvableCommand {
            check: check.to_string(),
            program: program.to_string(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_a_minimal_policy() {
        let snapshot = PolicySnapshot::parse(
            r#"
            [[check]]
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh", "-c", "exit 0"]
            "#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 1);
        let check = &snapshot.checks()[0];
        assert_eq!(check.name, "sh");
        assert_eq!(check.stage, Stage::Before);
        assert_eq!(check.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(check.on_failure, FailureMode::Block);
        assert_eq!(check.order, 0);
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let snapshot = PolicySnapshot::parse(
            r#"
            timeout_ms = 30000

            [[check]]
            name = "quality"
            stage = "after"
            matcher = 'input.new_string contains "TODO"'
            command = ["sh", "-c", "exit 1"]
            timeout_ms = 2000
            on_failure = "allow"
            order = 99
            "#,
        )
        .unwrap();

        let check = &snapshot.checks()[0];
        assert_eq!(check.name, "quality");
        assert_eq!(check.timeout, Duration::from_millis(2000));
        assert_eq!(check.on_failure, FailureMode::Allow);
        assert_eq!(check.order, 99);
    }

    #[test]
    fn top_level_timeout_inherited() {
        let snapshot = PolicySnapshot::parse(
            r#"
            timeout_ms = 1234

            [[check]]
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh", "-c", "exit 0"]
            "#,
        )
        .unwrap();
        assert_eq!(snapshot.checks()[0].timeout, Duration::from_millis(1234));
    }

    #[test]
    fn sorts_by_order_with_stable_ties() {
        let snapshot = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "third"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            order = 20

            [[check]]
            name = "first"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            order = 5

            [[check]]
            name = "second-a"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            order = 10

            [[check]]
            name = "second-b"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            order = 10
            "#,
        )
        .unwrap();

        let names: Vec<&str> = snapshot.checks().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second-a", "second-b", "third"]);
    }

    #[test]
    fn rejects_invalid_matcher() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "broken"
            stage = "before"
            matcher = 'tool === "Edit"'
            command = ["sh"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMatcher { check, .. } if check == "broken"));
    }

    #[test]
    fn rejects_empty_command() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "empty"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = []
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyCommand { .. }));
    }

    #[test]
    fn rejects_unresolvable_command() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "ghost"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["definitely-not-a-real-binary-name-7e2f"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableCommand { .. }));
    }

    #[test]
    fn resolves_script_paths_directly() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("check.sh");
        std::fs::File::create(&script)
            .unwrap()
            .write_all(b"#!/bin/sh\nexit 0\n")
            .unwrap();

        let policy = format!(
            r#"
            [[check]]
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["{}"]
            "#,
            script.display()
        );
        let snapshot = PolicySnapshot::parse(&policy).unwrap();
        assert_eq!(snapshot.checks()[0].name, "check.sh");
    }

    #[test]
    fn rejects_missing_script_path() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["/no/such/dir/check.sh"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnresolvableCommand { .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            timeout_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout { .. }));
    }

    #[test]
    fn rejects_fail_open_on_before_stage() {
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "risky"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            on_failure = "allow"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::FailOpenBeforeStage { check } if check == "risky"));
    }

    #[test]
    fn fail_open_is_fine_after_the_fact() {
        let snapshot = PolicySnapshot::parse(
            r#"
            [[check]]
            stage = "session_end"
            matcher = 'tool == "Stop"'
            command = ["sh"]
            on_failure = "allow"
            "#,
        )
        .unwrap();
        assert_eq!(snapshot.checks()[0].on_failure, FailureMode::Allow);
    }

    #[test]
    fn rejects_unknown_keys() {
        // A typo'd key must not silently disable part of the policy.
        let err = PolicySnapshot::parse(
            r#"
            [[check]]
            stage = "before"
            matchr = 'tool == "Edit"'
            command = ["sh"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = PolicySnapshot::load("/no/such/policy.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_round_trip_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(
            &path,
            r#"
            [[check]]
            name = "secrets"
            stage = "before"
            matcher = 'input.file_path contains ".env"'
            command = ["sh", "-c", "exit 2"]
            "#,
        )
        .unwrap();

        let snapshot = PolicySnapshot::load(&path).unwrap();
        assert_eq!(snapshot.len(), 1);

        let event = ToolCallEvent::new("Edit", Stage::Before).with_input("file_path", ".env");
        assert_eq!(snapshot.matching(&event).len(), 1);
    }

    #[test]
    fn matching_respects_stage_and_matcher() {
        let snapshot = PolicySnapshot::parse(
            r#"
            [[check]]
            name = "pre"
            stage = "before"
            matcher = 'tool == "Edit"'
            command = ["sh"]

            [[check]]
            name = "post"
            stage = "after"
            matcher = 'tool == "Edit"'
            command = ["sh"]
            "#,
        )
        .unwrap();

        let before = ToolCallEvent::new("Edit", Stage::Before);
        let matched: Vec<&str> = snapshot
            .matching(&before)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(matched, vec!["pre"]);

        let bash = ToolCallEvent::new("Bash", Stage::Before);
        assert!(snapshot.matching(&bash).is_empty());
    }
}
