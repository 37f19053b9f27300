//! Mock collaborators for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use phonodrill_core::token::{normalize_all, Token};
use phonodrill_core::traits::{Phonemizer, Recognizer, Transcription};

/// A mock phonemizer for testing the practice engine without a
/// dictionary file.
///
/// Returns configured phoneme sequences per word, with a literal-token
/// fallback for everything else.
pub struct MockPhonemizer {
    /// Map of lowercased word to phoneme tokens.
    responses: HashMap<String, Vec<Token>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last word looked up.
    last_word: Mutex<Option<String>>,
}

impl MockPhonemizer {
    /// Create a mock with the given word to raw-phoneme mappings.
    pub fn new(responses: &[(&str, &[&str])]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(word, phones)| (word.to_lowercase(), normalize_all(phones.iter())))
                .collect(),
            call_count: AtomicU32::new(0),
            last_word: Mutex::new(None),
        }
    }

    /// A mock that knows no words; every lookup falls back.
    pub fn unknowing() -> Self {
        Self::new(&[])
    }

    /// Get the number of calls made to this phonemizer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last word looked up.
    pub fn last_word(&self) -> Option<String> {
        self.last_word.lock().unwrap().clone()
    }
}

#[async_trait]
impl Phonemizer for MockPhonemizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn phonemes_for(&self, word: &str) -> anyhow::Result<Vec<Token>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_word.lock().unwrap() = Some(word.to_string());

        Ok(self
            .responses
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_else(|| vec![Token::new(word)]))
    }
}

/// A mock recognizer that returns a fixed transcription.
pub struct MockRecognizer {
    transcription: Transcription,
    call_count: AtomicU32,
}

impl MockRecognizer {
    /// A recognizer that always produces the given transcription.
    pub fn with_transcription(transcription: Transcription) -> Self {
        Self {
            transcription,
            call_count: AtomicU32::new(0),
        }
    }

    /// A phoneme-mode recognizer producing the given tokens.
    pub fn with_phonemes(raw: &[&str]) -> Self {
        Self::with_transcription(Transcription {
            text: String::new(),
            phonemes: normalize_all(raw.iter()),
            avg_confidence: None,
        })
    }

    /// A word-mode recognizer producing the given text.
    pub fn with_text(text: &str) -> Self {
        Self::with_transcription(Transcription {
            text: text.to_string(),
            phonemes: vec![],
            avg_confidence: None,
        })
    }

    /// Get the number of calls made to this recognizer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcribe(&self, _audio: &[u8]) -> anyhow::Result<Transcription> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.transcription.clone())
    }
}
