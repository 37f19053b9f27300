//! The practice engine orchestrator.
//!
//! Wires the pure scoring/progression functions to the injected
//! collaborators: phonemizer, recognizer, and progress store. Each call is
//! a short request/response computation; the only looping is the bounded
//! retry around conflicting progress writes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::curriculum::Curriculum;
use crate::error::EngineError;
use crate::progress::{self, ProgressRecord, MASTERY_THRESHOLD};
use crate::recommend::{self, Recommendation, RecommendPolicy};
use crate::report::AttemptReport;
use crate::scorer::{
    analyze_words, score_sentence, similarity_ratio, tokenize_sentence, SentenceScore,
    WordModeAnalysis,
};
use crate::summary::{self, LevelStatus, WordProgressSummary};
use crate::token::{normalize_all, Token};
use crate::traits::{Phonemizer, ProgressStore, Recognizer};

/// Configuration for the practice engine.
#[derive(Debug, Clone)]
pub struct PracticeEngineConfig {
    /// Score at or above which a word counts as mastered.
    pub mastery_threshold: f64,
    /// Which recommendation policy `next_word` runs.
    pub policy: RecommendPolicy,
    /// Retries when a progress write loses a concurrent update race.
    pub max_conflict_retries: u32,
}

impl Default for PracticeEngineConfig {
    fn default() -> Self {
        Self {
            mastery_threshold: MASTERY_THRESHOLD,
            policy: RecommendPolicy::TwoTier,
            max_conflict_retries: 3,
        }
    }
}

/// Result of scoring one phoneme-mode attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    pub result: SentenceScore,
    pub text_similarity: Option<f64>,
    pub confidence: Option<f64>,
    pub progress: ProgressRecord,
}

/// Result of scoring one word-mode attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct WordAttemptOutcome {
    pub analysis: WordModeAnalysis,
    /// Character-level similarity over the whole utterance.
    pub similarity: f64,
    pub progress: ProgressRecord,
}

/// An attempt scored from a recognizer transcription, in whichever mode
/// the recognizer produced output.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoredAttempt {
    Phoneme(AttemptOutcome),
    Word(WordAttemptOutcome),
}

impl ScoredAttempt {
    pub fn progress(&self) -> &ProgressRecord {
        match self {
            ScoredAttempt::Phoneme(outcome) => &outcome.progress,
            ScoredAttempt::Word(outcome) => &outcome.progress,
        }
    }
}

/// The central practice engine.
pub struct PracticeEngine {
    phonemizer: Arc<dyn Phonemizer>,
    store: Arc<dyn ProgressStore>,
    recognizer: Option<Arc<dyn Recognizer>>,
    curriculum: Curriculum,
    config: PracticeEngineConfig,
}

impl PracticeEngine {
    pub fn new(
        phonemizer: Arc<dyn Phonemizer>,
        store: Arc<dyn ProgressStore>,
        curriculum: Curriculum,
        config: PracticeEngineConfig,
    ) -> Self {
        Self {
            phonemizer,
            store,
            recognizer: None,
            curriculum,
            config,
        }
    }

    /// Attach a recognizer for `transcribe_and_score`.
    pub fn with_recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn config(&self) -> &PracticeEngineConfig {
        &self.config
    }

    /// Citation phonemes for one word: curriculum-stored phonemes win,
    /// otherwise the phonemizer resolves (or falls back to a literal
    /// token).
    async fn expected_phonemes(&self, word: &str) -> Result<Vec<Token>, EngineError> {
        if let Some(entry) = self.curriculum.find_word(word) {
            if let Some(phonemes) = &entry.phonemes {
                if !phonemes.is_empty() {
                    return Ok(normalize_all(phonemes));
                }
            }
        }

        let tokens = self
            .phonemizer
            .phonemes_for(word)
            .await
            .map_err(|e| EngineError::Phonemizer {
                word: word.to_string(),
                source: e,
            })?;

        if tokens.is_empty() {
            // The trait contract says non-empty; guard anyway.
            return Ok(vec![Token::new(word)]);
        }
        Ok(tokens)
    }

    /// Score observed phonemes against the expected text and fold the
    /// result into stored progress.
    ///
    /// The expected text must be a curriculum entry — it is the key the
    /// attempt is recorded under.
    pub async fn score_attempt(
        &self,
        user_id: Uuid,
        expected_text: &str,
        observed: &[Token],
        time_spent: f64,
    ) -> Result<AttemptOutcome, EngineError> {
        let word_id = self.curriculum_word_id(expected_text)?;

        let words = tokenize_sentence(expected_text);
        let phoneme_futures = words.iter().map(|w| self.expected_phonemes(w));
        let phonemes = futures::future::try_join_all(phoneme_futures).await?;
        let pairs: Vec<(String, Vec<Token>)> = words.into_iter().zip(phonemes).collect();

        let result = score_sentence(&pairs, observed);
        let progress = self
            .record_scored_attempt(user_id, &word_id, result.overall_score, time_spent)
            .await?;

        Ok(AttemptOutcome {
            result,
            text_similarity: None,
            confidence: None,
            progress,
        })
    }

    /// Score a word-mode transcription against the expected text. The
    /// attempt score is the positional average word score.
    pub async fn score_word_attempt(
        &self,
        user_id: Uuid,
        expected_text: &str,
        recognized_text: &str,
        time_spent: f64,
    ) -> Result<WordAttemptOutcome, EngineError> {
        let word_id = self.curriculum_word_id(expected_text)?;

        let analysis = analyze_words(expected_text, recognized_text);
        let similarity = similarity_ratio(expected_text, recognized_text);
        let progress = self
            .record_scored_attempt(user_id, &word_id, analysis.avg_word_score, time_spent)
            .await?;

        Ok(WordAttemptOutcome {
            analysis,
            similarity,
            progress,
        })
    }

    /// Run the attached recognizer over raw audio and score whichever
    /// output mode it produced (phonemes preferred).
    pub async fn transcribe_and_score(
        &self,
        user_id: Uuid,
        expected_text: &str,
        audio: &[u8],
        time_spent: f64,
    ) -> Result<ScoredAttempt, EngineError> {
        let recognizer = self
            .recognizer
            .as_ref()
            .ok_or_else(|| EngineError::Recognizer(anyhow::anyhow!("no recognizer configured")))?;

        let transcription = recognizer
            .transcribe(audio)
            .await
            .map_err(EngineError::Recognizer)?;

        if !transcription.phonemes.is_empty() {
            let mut outcome = self
                .score_attempt(user_id, expected_text, &transcription.phonemes, time_spent)
                .await?;
            outcome.confidence = transcription.avg_confidence;
            if !transcription.text.is_empty() {
                outcome.text_similarity =
                    Some(similarity_ratio(expected_text, &transcription.text));
            }
            Ok(ScoredAttempt::Phoneme(outcome))
        } else {
            let outcome = self
                .score_word_attempt(user_id, expected_text, &transcription.text, time_spent)
                .await?;
            Ok(ScoredAttempt::Word(outcome))
        }
    }

    /// Build a persistable report from a scored phoneme attempt.
    pub fn attempt_report(
        &self,
        user_id: Uuid,
        expected_text: &str,
        observed: &[Token],
        outcome: &AttemptOutcome,
    ) -> AttemptReport {
        AttemptReport {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            user_id,
            expected: expected_text.to_string(),
            observed: observed.to_vec(),
            result: outcome.result.clone(),
            text_similarity: outcome.text_similarity,
            confidence: outcome.confidence,
            progress: outcome.progress.clone(),
        }
    }

    /// Recommend the next word under the configured policy.
    pub async fn next_word(&self, user_id: Uuid) -> Result<Recommendation, EngineError> {
        let progress = self.progress_map(user_id).await?;

        match self.config.policy {
            RecommendPolicy::TwoTier => Ok(recommend::recommend_next(
                &self.curriculum,
                &progress,
                self.config.mastery_threshold,
            )),
            RecommendPolicy::WeightedPriority => {
                if self.curriculum.levels.is_empty() {
                    return Ok(Recommendation::Unavailable {
                        reason: "no levels configured".into(),
                    });
                }
                for level in &self.curriculum.levels {
                    match recommend::adaptive_next(level, &progress) {
                        rec @ Recommendation::Practice { .. } => return Ok(rec),
                        // Complete or empty levels: move on.
                        Recommendation::LevelComplete { .. }
                        | Recommendation::Unavailable { .. } => continue,
                        Recommendation::AllMastered => continue,
                    }
                }
                Ok(Recommendation::AllMastered)
            }
        }
    }

    /// Weighted-priority recommendation scoped to one level.
    pub async fn adaptive_next(
        &self,
        user_id: Uuid,
        level_name: &str,
    ) -> Result<Recommendation, EngineError> {
        let Some(level) = self.curriculum.level(level_name) else {
            // Structured result, not a hard failure: the caller asked a
            // recommendation question and gets a recommendation answer.
            return Ok(Recommendation::Unavailable {
                reason: format!("level not found: {level_name}"),
            });
        };

        let progress = self.progress_map(user_id).await?;
        Ok(recommend::adaptive_next(level, &progress))
    }

    /// Completion stats for one level.
    pub async fn level_status(
        &self,
        user_id: Uuid,
        level_name: &str,
    ) -> Result<LevelStatus, EngineError> {
        let level = self
            .curriculum
            .level(level_name)
            .ok_or_else(|| EngineError::LevelNotFound(level_name.to_string()))?;

        let progress = self.progress_map(user_id).await?;
        Ok(summary::level_status(
            level,
            &progress,
            self.config.mastery_threshold,
        ))
    }

    /// A user's progress across all words, shaped for display.
    pub async fn progress_summary(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<WordProgressSummary>, EngineError> {
        let records = self.store.list_progress(user_id).await?;
        Ok(summary::progress_summary(&records))
    }

    /// Zero a word's progress. Returns `None` when the user has no record
    /// for the word.
    pub async fn reset_progress(
        &self,
        user_id: Uuid,
        word: &str,
    ) -> Result<Option<ProgressRecord>, EngineError> {
        let word_id = self.curriculum_word_id(word)?;

        for attempt in 0..=self.config.max_conflict_retries {
            let Some(existing) = self.store.get_progress(user_id, &word_id).await? else {
                return Ok(None);
            };
            let cleared = progress::reset(&existing.record);
            match self.store.put_progress(cleared, Some(existing.version)).await {
                Ok(stored) => return Ok(Some(stored.record)),
                Err(e) if e.is_retryable() => {
                    tracing::warn!("reset for {word_id} hit a conflict (attempt {attempt}), retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::RetriesExhausted {
            word_id,
            attempts: self.config.max_conflict_retries + 1,
        })
    }

    fn curriculum_word_id(&self, text: &str) -> Result<String, EngineError> {
        self.curriculum
            .find_word(text)
            .map(|w| w.id.clone())
            .ok_or_else(|| EngineError::UnknownWord(text.to_string()))
    }

    /// Read-modify-write of one progress record, retried on conflicting
    /// concurrent updates with a fresh read each time.
    async fn record_scored_attempt(
        &self,
        user_id: Uuid,
        word_id: &str,
        score: f64,
        time_spent: f64,
    ) -> Result<ProgressRecord, EngineError> {
        for attempt in 0..=self.config.max_conflict_retries {
            let existing = self.store.get_progress(user_id, word_id).await?;
            let (record, expected_version) = match &existing {
                Some(versioned) => (
                    progress::record_attempt(
                        Some(&versioned.record),
                        user_id,
                        word_id,
                        score,
                        time_spent,
                        self.config.mastery_threshold,
                        Utc::now(),
                    ),
                    Some(versioned.version),
                ),
                None => (
                    progress::record_attempt(
                        None,
                        user_id,
                        word_id,
                        score,
                        time_spent,
                        self.config.mastery_threshold,
                        Utc::now(),
                    ),
                    None,
                ),
            };

            match self.store.put_progress(record, expected_version).await {
                Ok(stored) => return Ok(stored.record),
                Err(e) if e.is_retryable() => {
                    tracing::warn!(
                        "attempt for {word_id} lost an update race (attempt {attempt}), retrying"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(EngineError::RetriesExhausted {
            word_id: word_id.to_string(),
            attempts: self.config.max_conflict_retries + 1,
        })
    }

    async fn progress_map(
        &self,
        user_id: Uuid,
    ) -> Result<HashMap<String, ProgressRecord>, EngineError> {
        let records = self.store.list_progress(user_id).await?;
        Ok(records
            .into_iter()
            .map(|r| (r.word_id.clone(), r))
            .collect())
    }
}
