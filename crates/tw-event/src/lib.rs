//! # tw-event
//!
//! Data model for the Toolwarden mediation pipeline.
//!
//! Defines the types every other crate speaks: [`ToolCallEvent`] (an
//! intercepted operation), [`Stage`] (when checks run relative to the
//! operation), [`Verdict`] (one check's outcome), and [`DispatchResult`]
//! (the aggregated decision handed back to the host).
//!
//! ## Key invariants
//!
//! - Events are immutable snapshots: `tool` and `input` are fully populated
//!   before dispatch, and nothing here performs I/O or infers fields.
//! - Decisions aggregate by severity: `Block` beats `Warn` beats `Allow`.
//! - Exactly one `DispatchResult` is produced per event.

pub mod event;
pub mod verdict;

pub use event::{Stage, ToolCallEvent};
pub use verdict::{Decision, DispatchResult, Verdict};
