// error.rs — Matcher parse errors.
//
// Byte offsets point into the matcher source string so config errors can
// quote the exact spot.

use thiserror::Error;

/// Errors produced while parsing a matcher expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A character that no token can start with.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    /// A string literal with no closing quote.
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// An unsupported escape inside a string literal.
    #[error("invalid escape '\\{ch}' at offset {offset}")]
    InvalidEscape { ch: char, offset: usize },

    /// The parser found a token it cannot use here.
    #[error("expected {expected} at offset {offset}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// The expression ended mid-construct.
    #[error("unexpected end of matcher expression, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// A complete expression was parsed but input remains.
    #[error("trailing input at offset {offset}: {found}")]
    TrailingInput { found: String, offset: usize },

    /// The matcher source was empty or whitespace-only.
    #[error("empty matcher expression")]
    Empty,
}
