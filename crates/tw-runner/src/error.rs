// error.rs — Check execution failures.
//
// These never cross the runner boundary as Err: the runner folds them into
// a synthesized verdict. The type exists so the fold site and the logs can
// name exactly what went wrong.

use thiserror::Error;

/// Ways a check process can fail to produce a usable verdict.
#[derive(Debug, Error)]
pub enum CheckExecutionError {
    /// The process could not be started at all.
    #[error("check '{name}' failed to start: {source}")]
    SpawnFailed {
        name: String,
        source: std::io::Error,
    },

    /// Waiting on the process failed.
    #[error("check '{name}' could not be awaited: {source}")]
    WaitFailed {
        name: String,
        source: std::io::Error,
    },

    /// The process exceeded its deadline and was killed.
    #[error("check '{name}' timed out after {timeout_ms}ms")]
    TimedOut { name: String, timeout_ms: u64 },

    /// The process exited with a status outside the 0/1/2 contract.
    #[error("check '{name}' exited with undefined status {status}")]
    UndefinedStatus { name: String, status: i32 },

    /// The process was terminated by a signal (no exit status).
    #[error("check '{name}' was terminated by a signal")]
    Signalled { name: String },
}
