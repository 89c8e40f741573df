//! # tw-runner
//!
//! Check execution for Toolwarden: runs one external check process per
//! invocation and turns whatever happens into a [`Verdict`].
//!
//! The process contract (any language):
//! - stdin: one JSON document describing the event;
//! - stdout (optional): one JSON document with `block`, `message`,
//!   `feedback`, `continue` fields;
//! - exit status: `0` allow, `1` warn, `2` block.
//!
//! ## Key invariants
//!
//! - Exactly one process is spawned and awaited per [`CheckRunner::run`];
//!   nothing is left running after it returns, including on timeout.
//! - Execution failures (spawn error, crash, undefined exit status,
//!   timeout) never surface as `Err` — they are recovered into a
//!   synthesized verdict per the check's [`FailureMode`].
//! - A `Block` verdict always carries a message naming its origin.

pub mod error;
pub mod output;
pub mod runner;

pub use error::CheckExecutionError;
pub use output::CheckOutput;
pub use runner::{CheckRunner, FailureMode};
