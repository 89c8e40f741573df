//! # tw-dispatch
//!
//! The mediation entry point: every operation an agent attempts flows
//! through [`Dispatcher::intercept`], which runs the checks registered for
//! the event's stage and aggregates their verdicts into one
//! [`DispatchResult`](tw_event::DispatchResult).
//!
//! ## Key invariants
//!
//! - **Default allow**: zero matching checks → `Allow`, empty messages.
//! - **Block wins and short-circuits**: the first `Block` verdict ends the
//!   stage; later checks are not invoked.
//! - **Strictly sequential**: checks run one at a time in `order`, so
//!   ordering-dependent policies stay deterministic.
//! - **The dispatcher never hangs**: every check invocation is bounded by
//!   its timeout.
//!
//! The caller honors the result: a `Block` means the operation must not be
//! performed, `messages` go to the operator, `feedback` goes back to the
//! agent.

pub mod dispatcher;
pub mod pipeline;

pub use dispatcher::Dispatcher;
pub use pipeline::{run_stage, StageOutcome};
