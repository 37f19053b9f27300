//! Collaborator trait definitions.
//!
//! These async traits are implemented by the `phonodrill-adapters` and
//! `phonodrill-store` crates respectively. The engine holds them as
//! explicitly constructed, injected handles — never hidden module-level
//! singletons — so tests can swap in fakes freely.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::progress::ProgressRecord;
use crate::token::Token;

// ---------------------------------------------------------------------------
// Phonemizer
// ---------------------------------------------------------------------------

/// Maps a word to its citation phoneme sequence.
///
/// Implementations must return a non-empty sequence: when a word is
/// unknown, fall back to a single token equal to the word itself rather
/// than failing. Errors are reserved for genuine collaborator failures.
#[async_trait]
pub trait Phonemizer: Send + Sync {
    /// Human-readable adapter name (e.g. "cmudict").
    fn name(&self) -> &str;

    /// Citation phonemes for a single word, stress markers stripped.
    async fn phonemes_for(&self, word: &str) -> anyhow::Result<Vec<Token>>;
}

// ---------------------------------------------------------------------------
// Recognizer
// ---------------------------------------------------------------------------

/// Output of a speech recognizer run over one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    /// Recognized text (word mode); may be empty in phoneme-only mode.
    pub text: String,
    /// Recognized phoneme tokens (phoneme mode); may be empty in word mode.
    pub phonemes: Vec<Token>,
    /// Mean per-word confidence, when the recognizer reports one.
    pub avg_confidence: Option<f64>,
}

/// The seam where observed tokens enter the engine. Audio decoding and
/// model inference live entirely behind this trait.
#[async_trait]
pub trait Recognizer: Send + Sync {
    fn name(&self) -> &str;

    async fn transcribe(&self, audio: &[u8]) -> anyhow::Result<Transcription>;
}

// ---------------------------------------------------------------------------
// Progress store
// ---------------------------------------------------------------------------

/// A progress record paired with the version the store read it at.
///
/// The version is the compare-and-swap token for [`ProgressStore::put_progress`]:
/// writing back with a stale version yields [`StoreError::Conflict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionedRecord {
    pub record: ProgressRecord,
    pub version: u64,
}

/// Persistence collaborator for progress records.
///
/// Implementations must make `put_progress` atomic per (user, word) key so
/// two concurrent attempts cannot silently lose an update.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Read the current record and its version, if any.
    async fn get_progress(
        &self,
        user_id: Uuid,
        word_id: &str,
    ) -> Result<Option<VersionedRecord>, StoreError>;

    /// Atomic upsert. `expected_version` must be `None` to create a new
    /// record and `Some(version)` (from a prior read) to replace one;
    /// any mismatch with the stored state fails with
    /// [`StoreError::Conflict`].
    async fn put_progress(
        &self,
        record: ProgressRecord,
        expected_version: Option<u64>,
    ) -> Result<VersionedRecord, StoreError>;

    /// All records for a user, in stable (word id) order.
    async fn list_progress(&self, user_id: Uuid) -> Result<Vec<ProgressRecord>, StoreError>;
}
