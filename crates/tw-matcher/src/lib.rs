//! # tw-matcher
//!
//! Matcher engine for Toolwarden: decides whether a check applies to an
//! intercepted event.
//!
//! Matchers are written in a small closed expression grammar — equality,
//! substring/prefix/suffix tests, membership, and and/or/not composition —
//! parsed once at config load into a tagged-variant AST and evaluated by a
//! pure interpreter. Matcher text is never executed as code.
//!
//! ```
//! use tw_event::{Stage, ToolCallEvent};
//! use tw_matcher::parse;
//!
//! let expr = parse(r#"tool == "Edit" and input.file_path contains ".env""#).unwrap();
//! let event = ToolCallEvent::new("Edit", Stage::Before).with_input("file_path", ".env.local");
//! assert!(expr.matches(&event));
//! ```
//!
//! ## Key invariants
//!
//! - **Fail closed**: a malformed matcher is a [`ParseError`] at load time,
//!   never a predicate that silently matches everything (or nothing).
//! - **Total evaluation**: once parsed, [`Expr::matches`] cannot fail —
//!   missing event fields simply don't satisfy positive comparisons.
//! - **No side effects**: evaluation reads the event and nothing else.

pub mod error;
pub mod expr;
pub mod parse;

pub use error::ParseError;
pub use expr::{Cmp, Expr, Field};
pub use parse::parse;
