//! Aggregate progress statistics.
//!
//! Per-level completion stats and per-user progress summaries, computed
//! from progress record snapshots. Pure functions over materialized data.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curriculum::Level;
use crate::progress::ProgressRecord;
use crate::round2;

/// Where a word stands for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordStatus {
    Mastered,
    InProgress,
    NotStarted,
}

/// One row of a level's per-word breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordStatusRow {
    pub word: String,
    pub status: WordStatus,
    pub score: Option<f64>,
    pub attempts: u32,
}

/// Completion stats for one user on one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelStatus {
    pub level: String,
    pub total_words: usize,
    pub mastered: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub completion_percent: f64,
    pub words: Vec<WordStatusRow>,
}

/// Compute a level's completion stats from a progress snapshot keyed by
/// word id.
pub fn level_status(
    level: &Level,
    progress: &HashMap<String, ProgressRecord>,
    mastery_threshold: f64,
) -> LevelStatus {
    let mut mastered = 0usize;
    let mut in_progress = 0usize;
    let mut not_started = 0usize;
    let mut words = Vec::with_capacity(level.words.len());

    for word in &level.words {
        let (status, score, attempts) = match progress.get(&word.id) {
            None => {
                not_started += 1;
                (WordStatus::NotStarted, None, 0)
            }
            Some(record) => {
                let score = Some(round2(record.score));
                if record.score >= mastery_threshold {
                    mastered += 1;
                    (WordStatus::Mastered, score, record.attempts)
                } else if record.attempts > 0 {
                    in_progress += 1;
                    (WordStatus::InProgress, score, record.attempts)
                } else {
                    // A reset record exists but counts as untouched.
                    not_started += 1;
                    (WordStatus::NotStarted, score, record.attempts)
                }
            }
        };
        words.push(WordStatusRow {
            word: word.text.clone(),
            status,
            score,
            attempts,
        });
    }

    let total_words = level.words.len();
    let completion_percent = if total_words > 0 {
        round2(mastered as f64 / total_words as f64 * 100.0)
    } else {
        0.0
    };

    LevelStatus {
        level: level.name.clone(),
        total_words,
        mastered,
        in_progress,
        not_started,
        completion_percent,
        words,
    }
}

/// One word's progress, shaped for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProgressSummary {
    pub word: String,
    pub score: f64,
    pub attempts: u32,
    pub mastered: bool,
    pub moving_avg_score: f64,
    pub streak_score: i32,
    pub penalty_score: f64,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

/// Shape a user's raw records into display rows, preserving input order.
pub fn progress_summary(records: &[ProgressRecord]) -> Vec<WordProgressSummary> {
    records
        .iter()
        .map(|record| WordProgressSummary {
            word: record.word_id.clone(),
            score: round2(record.score),
            attempts: record.attempts,
            mastered: record.mastered,
            moving_avg_score: record.moving_avg_score,
            streak_score: record.streak_score,
            penalty_score: record.penalty_score,
            last_attempt_at: record.last_attempt_at,
        })
        .collect()
}
