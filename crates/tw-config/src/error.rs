// error.rs — Configuration errors. All of them are fatal at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a policy file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The policy file could not be read.
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The document is not valid TOML (or has unknown keys — a typo'd key
    /// would silently disable part of the policy).
    #[error("invalid policy document: {0}")]
    Toml(#[from] toml::de::Error),

    /// A check's matcher expression does not parse.
    #[error("check '{check}': invalid matcher: {source}")]
    InvalidMatcher {
        check: String,
        source: tw_matcher::ParseError,
    },

    /// A check has an empty command array.
    #[error("check '{check}': command is empty")]
    EmptyCommand { check: String },

    /// A check's program does not resolve to an executable entity.
    #[error("check '{check}': command '{program}' does not resolve to an executable: {reason}")]
    UnresolvableCommand {
        check: String,
        program: String,
        reason: String,
    },

    /// A check is configured with a zero timeout.
    #[error("check '{check}': timeout_ms must be non-zero")]
    ZeroTimeout { check: String },

    /// Fail-open is not a legal failure mode for `before`-stage checks.
    #[error("check '{check}': on_failure = \"allow\" is not permitted for before-stage checks")]
    FailOpenBeforeStage { check: String },
}
