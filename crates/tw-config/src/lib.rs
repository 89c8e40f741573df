//! # tw-config
//!
//! Policy configuration for Toolwarden.
//!
//! Parses `policy.toml` — an ordered list of check registrations — into an
//! immutable [`PolicySnapshot`] the dispatcher shares across dispatches.
//!
//! ## Key invariants
//!
//! - **Fail fast**: any structurally invalid entry (unparseable matcher,
//!   unresolvable command, fail-open on a `before` check, zero timeout,
//!   unknown key) aborts loading. Partial policy enforcement is worse than
//!   none — it creates a false sense of safety.
//! - **Immutable after load**: a snapshot is never modified; policy changes
//!   mean building a new snapshot.
//! - **Deterministic order**: checks sort stably by `order` (default:
//!   declaration index), so ties keep declaration position.

pub mod definition;
pub mod error;
pub mod loader;
pub mod paths;

pub use definition::CheckDefinition;
pub use error::ConfigError;
pub use loader::PolicySnapshot;
pub use paths::WardenPaths;
