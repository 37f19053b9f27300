//! Engine and persistence error types.
//!
//! Defined in `phonodrill-core` so the practice engine can classify store
//! failures for its conflict-retry loop without string matching. Scoring
//! itself never fails — malformed input degrades to a 0.0 score — so the
//! taxonomy here covers collaborators and lookups only.

use thiserror::Error;
use uuid::Uuid;

/// Errors from the persistence collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A concurrent update won the race; re-read and retry.
    #[error("concurrent update conflict for {user_id}/{word_id}")]
    Conflict { user_id: Uuid, word_id: String },

    /// An I/O failure underneath the store.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be decoded.
    #[error("storage corrupt: {0}")]
    Corrupt(String),
}

impl StoreError {
    /// Returns `true` if retrying the whole read-modify-write is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Errors surfaced by the practice engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The attempted word is not part of the curriculum.
    #[error("unknown word: {0}")]
    UnknownWord(String),

    /// The requested level does not exist.
    #[error("level not found: {0}")]
    LevelNotFound(String),

    /// Every retry of a conflicting update lost the race.
    #[error("recording attempt for '{word_id}' failed after {attempts} conflicting updates")]
    RetriesExhausted { word_id: String, attempts: u32 },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The phonemizer collaborator failed outright (distinct from an
    /// unknown word, which falls back to a literal token).
    #[error("phonemizer failure for '{word}': {source}")]
    Phonemizer {
        word: String,
        #[source]
        source: anyhow::Error,
    },

    /// The recognizer collaborator failed or is not configured.
    #[error("recognizer failure: {0}")]
    Recognizer(#[source] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_retryable() {
        let err = StoreError::Conflict {
            user_id: Uuid::nil(),
            word_id: "cat".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn io_is_not_retryable() {
        let err = StoreError::Io(std::io::Error::other("disk on fire"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn error_messages_name_the_key() {
        let err = StoreError::Conflict {
            user_id: Uuid::nil(),
            word_id: "cat".into(),
        };
        assert!(err.to_string().contains("cat"));

        let err = EngineError::UnknownWord("zebra".into());
        assert_eq!(err.to_string(), "unknown word: zebra");
    }
}
