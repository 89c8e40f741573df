//! # tw-journal
//!
//! Decision journal for Toolwarden: one JSONL line per dispatch, recording
//! what was intercepted, which checks ran, and what the outcome was.
//!
//! The journal is an explicitly constructed accumulator the host injects
//! into the dispatcher — never a process-wide singleton. JSONL keeps it
//! append-friendly and greppable.
//!
//! ## Key invariants
//!
//! - Append-only: the file is opened in append mode and never rewritten.
//! - Each record is flushed as it is written; a crash loses at most the
//!   record being written.

pub mod error;
pub mod journal;
pub mod record;

pub use error::JournalError;
pub use journal::DecisionJournal;
pub use record::{CheckOutcome, DecisionRecord};
