// runner.rs — One external process per check invocation.
//
// The runner owns the whole child lifecycle: spawn, feed the event on
// stdin, drain stdout/stderr, enforce the deadline, reap. Writer and
// reader threads keep every pipe moving so a check that ignores stdin (or
// floods stdout before reading input) cannot deadlock the dispatch.
//
// Execution stays synchronous: the dispatcher blocks on one check at a
// time, and ordering-dependent policies rely on that.

use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tw_event::{Decision, ToolCallEvent, Verdict};

use crate::error::CheckExecutionError;
use crate::output::CheckOutput;

/// What a check's verdict becomes when the check itself fails (spawn
/// error, crash, undefined exit status, timeout).
///
/// `Block` is the only legal mode for `Before`-stage checks — they guard
/// irreversible actions. `Allow` is an opt-in for stages where blocking
/// has no protective value; the config loader enforces the restriction.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Fail closed: a failing check blocks the operation.
    #[default]
    Block,
    /// Fail open: a failing check is treated as if it allowed.
    Allow,
}

/// Executes checks as isolated child processes.
pub struct CheckRunner {
    /// How often the child is polled for exit while the deadline runs.
    poll_interval: Duration,
}

impl CheckRunner {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
        }
    }

    /// Run one check against one event and return its verdict.
    ///
    /// Never returns an error: execution failures are folded into a
    /// synthesized verdict per `on_failure`, and the synthesized message
    /// names the failing check.
    pub fn run(
        &self,
        name: &str,
        command: &[String],
        timeout: Duration,
        on_failure: FailureMode,
        event: &ToolCallEvent,
    ) -> Verdict {
        match self.execute(name, command, timeout, event) {
            Ok(raw) => match raw.code {
                0 | 1 | 2 => interpret(name, raw.code, CheckOutput::parse(name, &raw.stdout)),
                status => failure_verdict(
                    name,
                    on_failure,
                    CheckExecutionError::UndefinedStatus {
                        name: name.to_string(),
                        status,
                    },
                ),
            },
            Err(error) => failure_verdict(name, on_failure, error),
        }
    }

    /// Spawn, feed, await, reap. Returns the exit code and captured stdout.
    fn execute(
        &self,
        name: &str,
        command: &[String],
        timeout: Duration,
        event: &ToolCallEvent,
    ) -> Result<RawOutput, CheckExecutionError> {
        let (program, args) = command.split_first().ok_or_else(|| {
            CheckExecutionError::SpawnFailed {
                name: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            }
        })?;

        let payload =
            serde_json::to_vec(event).map_err(|source| CheckExecutionError::SpawnFailed {
                name: name.to_string(),
                source: source.into(),
            })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CheckExecutionError::SpawnFailed {
                name: name.to_string(),
                source,
            })?;

        // All three pipes get their own thread before we start waiting.
        // A killed child closes the pipes, so these threads always finish.
        let writer = child.stdin.take().map(|mut pipe| {
            thread::spawn(move || {
                // BrokenPipe here just means the check exited (or never
                // read stdin) — that's the check's prerogative.
                let _ = pipe.write_all(&payload);
            })
        });
        let stdout_reader = child.stdout.take().map(read_to_string_thread);
        let stderr_reader = child.stderr.take().map(read_to_string_thread);

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        join_quietly(writer, stdout_reader, stderr_reader);
                        return Err(CheckExecutionError::TimedOut {
                            name: name.to_string(),
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(source) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    join_quietly(writer, stdout_reader, stderr_reader);
                    return Err(CheckExecutionError::WaitFailed {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        };

        if let Some(handle) = writer {
            let _ = handle.join();
        }
        let stdout = stdout_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        let stderr = stderr_reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();
        if !stderr.trim().is_empty() {
            tracing::debug!(check = name, stderr = %stderr.trim(), "check wrote to stderr");
        }

        match status.code() {
            Some(code) => Ok(RawOutput { code, stdout }),
            None => Err(CheckExecutionError::Signalled {
                name: name.to_string(),
            }),
        }
    }
}

impl Default for CheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

struct RawOutput {
    code: i32,
    stdout: String,
}

fn read_to_string_thread(mut pipe: impl Read + Send + 'static) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        let _ = pipe.read_to_string(&mut buffer);
        buffer
    })
}

fn join_quietly(
    writer: Option<JoinHandle<()>>,
    stdout_reader: Option<JoinHandle<String>>,
    stderr_reader: Option<JoinHandle<String>>,
) {
    if let Some(handle) = writer {
        let _ = handle.join();
    }
    if let Some(handle) = stdout_reader {
        let _ = handle.join();
    }
    if let Some(handle) = stderr_reader {
        let _ = handle.join();
    }
}

/// Map a contract exit status (0/1/2) plus optional parsed output to a
/// verdict.
///
/// The JSON payload can only escalate (`block: true`, `continue: false`);
/// the exit status remains authoritative otherwise. A `Block` always gets
/// a message; a `Warn` with neither message nor feedback gets one too, so
/// warnings are never silently dropped.
fn interpret(name: &str, code: i32, output: Option<CheckOutput>) -> Verdict {
    let output = output.unwrap_or_default();
    let mut decision = match code {
        0 => Decision::Allow,
        1 => Decision::Warn,
        _ => Decision::Block,
    };
    if output.requests_block() {
        decision = Decision::Block;
    }

    let mut message = output.message;
    match decision {
        Decision::Block if message.is_none() => {
            message = Some(format!("check '{}' blocked the operation", name));
        }
        Decision::Warn if message.is_none() && output.feedback.is_none() => {
            message = Some(format!("check '{}' reported a warning", name));
        }
        _ => {}
    }

    Verdict {
        decision,
        message,
        feedback: output.feedback,
    }
}

/// Fold an execution failure into a verdict per the failure mode.
fn failure_verdict(name: &str, mode: FailureMode, error: CheckExecutionError) -> Verdict {
    match mode {
        FailureMode::Block => {
            tracing::warn!(check = name, error = %error, "check failed; blocking (fail-closed)");
            Verdict::block(error.to_string())
        }
        FailureMode::Allow => {
            tracing::warn!(check = name, error = %error, "check failed; allowing (fail-open)");
            Verdict::allow()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tw_event::Stage;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    fn event() -> ToolCallEvent {
        ToolCallEvent::new("Edit", Stage::Before).with_input("file_path", "src/lib.rs")
    }

    fn run(script: &str, mode: FailureMode) -> Verdict {
        CheckRunner::new().run(
            "test-check",
            &sh(script),
            Duration::from_secs(5),
            mode,
            &event(),
        )
    }

    #[test]
    fn exit_zero_allows() {
        let verdict = run("exit 0", FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Allow);
        assert!(verdict.message.is_none());
    }

    #[test]
    fn exit_zero_with_feedback() {
        let verdict = run(
            r#"echo '{"feedback": "auto-formatted: lib.rs"}'; exit 0"#,
            FailureMode::Block,
        );
        assert_eq!(verdict.decision, Decision::Allow);
        assert_eq!(verdict.feedback.as_deref(), Some("auto-formatted: lib.rs"));
    }

    #[test]
    fn exit_one_warns_with_message() {
        let verdict = run(
            r#"echo '{"message": "unresolved TODO"}'; exit 1"#,
            FailureMode::Block,
        );
        assert_eq!(verdict.decision, Decision::Warn);
        assert_eq!(verdict.message.as_deref(), Some("unresolved TODO"));
    }

    #[test]
    fn silent_warn_gets_synthesized_message() {
        let verdict = run("exit 1", FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Warn);
        assert!(verdict.message.as_deref().unwrap().contains("test-check"));
    }

    #[test]
    fn exit_two_blocks_with_message() {
        let verdict = run(
            r#"echo '{"block": true, "message": "BLOCKED: secret file"}'; exit 2"#,
            FailureMode::Block,
        );
        assert_eq!(verdict.decision, Decision::Block);
        assert_eq!(verdict.message.as_deref(), Some("BLOCKED: secret file"));
    }

    #[test]
    fn silent_block_gets_synthesized_message() {
        let verdict = run("exit 2", FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Block);
        assert!(verdict.message.as_deref().unwrap().contains("test-check"));
    }

    #[test]
    fn json_block_escalates_exit_zero() {
        let verdict = run(
            r#"echo '{"block": true, "message": "nope"}'; exit 0"#,
            FailureMode::Block,
        );
        assert_eq!(verdict.decision, Decision::Block);
        assert_eq!(verdict.message.as_deref(), Some("nope"));
    }

    #[test]
    fn continue_false_escalates() {
        let verdict = run(r#"echo '{"continue": false}'; exit 0"#, FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Block);
    }

    #[test]
    fn unparseable_output_falls_back_to_exit_status() {
        let verdict = run("echo 'plain text, not json'; exit 0", FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Allow);
        assert!(verdict.feedback.is_none());
    }

    #[test]
    fn undefined_exit_status_fails_closed() {
        let verdict = run("exit 7", FailureMode::Block);
        assert_eq!(verdict.decision, Decision::Block);
        let message = verdict.message.unwrap();
        assert!(message.contains("test-check"));
        assert!(message.contains("7"));
    }

    #[test]
    fn undefined_exit_status_fails_open_when_configured() {
        let verdict = run("exit 7", FailureMode::Allow);
        assert_eq!(verdict.decision, Decision::Allow);
    }

    #[test]
    fn spawn_failure_fails_closed() {
        let verdict = CheckRunner::new().run(
            "missing",
            &["/nonexistent/check-binary".to_string()],
            Duration::from_secs(1),
            FailureMode::Block,
            &event(),
        );
        assert_eq!(verdict.decision, Decision::Block);
        assert!(verdict.message.unwrap().contains("missing"));
    }

    #[test]
    fn timeout_kills_and_fails_closed() {
        let started = Instant::now();
        let verdict = CheckRunner::new().run(
            "slow",
            &sh("sleep 30"),
            Duration::from_millis(100),
            FailureMode::Block,
            &event(),
        );
        assert_eq!(verdict.decision, Decision::Block);
        assert!(verdict.message.unwrap().contains("timed out"));
        // The child was killed, not awaited to completion.
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn timeout_fails_open_when_configured() {
        let verdict = CheckRunner::new().run(
            "slow",
            &sh("sleep 30"),
            Duration::from_millis(100),
            FailureMode::Allow,
            &event(),
        );
        assert_eq!(verdict.decision, Decision::Allow);
    }

    #[test]
    fn event_is_delivered_on_stdin() {
        // The check greps its stdin for the tool name.
        let script = r#"grep -q '"tool":"Bash"' - && exit 2 || exit 0"#;
        let runner = CheckRunner::new();

        let bash = ToolCallEvent::new("Bash", Stage::Before).with_input("command", "rm -rf /");
        let verdict = runner.run(
            "dangerous",
            &sh(script),
            Duration::from_secs(5),
            FailureMode::Block,
            &bash,
        );
        assert_eq!(verdict.decision, Decision::Block);

        let edit = event();
        let verdict = runner.run(
            "dangerous",
            &sh(script),
            Duration::from_secs(5),
            FailureMode::Block,
            &edit,
        );
        assert_eq!(verdict.decision, Decision::Allow);
    }

    #[test]
    fn large_event_does_not_deadlock_a_check_that_ignores_stdin() {
        // Bigger than any pipe buffer; the check never reads stdin.
        let big = "x".repeat(512 * 1024);
        let noisy = ToolCallEvent::new("Edit", Stage::Before).with_input("new_string", big);
        let verdict = CheckRunner::new().run(
            "ignores-stdin",
            &sh("exit 0"),
            Duration::from_secs(10),
            FailureMode::Block,
            &noisy,
        );
        assert_eq!(verdict.decision, Decision::Allow);
    }
}
