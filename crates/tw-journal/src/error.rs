// error.rs — Journal errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from opening, writing, or reading the decision journal.
#[derive(Debug, Error)]
pub enum JournalError {
    /// The journal file could not be opened or created.
    #[error("failed to open journal at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A record could not be serialized or parsed.
    #[error("journal serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A read or write on the journal file failed.
    #[error("journal I/O error: {0}")]
    Io(#[from] std::io::Error),
}
