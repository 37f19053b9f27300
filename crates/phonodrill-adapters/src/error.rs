//! Adapter error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading adapter resources.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("failed to read dictionary {path}: {source}")]
    DictionaryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A dictionary line that is neither a comment nor `WORD PH PH ...`.
    #[error("malformed dictionary entry at {path}:{line}: {content}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        content: String,
    },
}
