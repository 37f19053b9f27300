//! Per-(user, word) mastery state machine.
//!
//! Each attempt folds into a small set of signals: the latest score, a
//! signed improvement streak, a recency-weighted moving average, and an
//! asymmetric penalty that accumulates on poor attempts and decays slowly
//! on good ones. The transition function is pure — callers own the read and
//! write of the stored record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::round2;

/// Score at or above which a word counts as mastered.
pub const MASTERY_THRESHOLD: f64 = 80.0;
/// Attempts below this score accumulate penalty.
pub const PASS_FLOOR: f64 = 60.0;

const PENALTY_STEP: f64 = 0.5;
const PENALTY_DECAY: f64 = 0.2;

/// Stored progress for one user on one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub user_id: Uuid,
    pub word_id: String,
    /// Latest attempt score (0–100). Overwritten, never averaged.
    pub score: f64,
    pub attempts: u32,
    pub mastered: bool,
    /// Recency-weighted running average: `round((old + new) / 2, 2)`.
    pub moving_avg_score: f64,
    /// +1 per improving attempt, -1 per declining, unchanged when equal.
    pub streak_score: i32,
    /// Grows by 0.5 per attempt under the pass floor, decays by 0.2
    /// otherwise, never below zero.
    pub penalty_score: f64,
    /// Accumulated practice time in seconds.
    pub total_time: f64,
    pub last_attempt_at: Option<DateTime<Utc>>,
}

/// Fold one attempt into the stored record, or create the record on a
/// user's first attempt at a word.
pub fn record_attempt(
    existing: Option<&ProgressRecord>,
    user_id: Uuid,
    word_id: &str,
    score: f64,
    time_spent: f64,
    mastery_threshold: f64,
    now: DateTime<Utc>,
) -> ProgressRecord {
    match existing {
        None => ProgressRecord {
            user_id,
            word_id: word_id.to_string(),
            score,
            attempts: 1,
            mastered: score >= mastery_threshold,
            moving_avg_score: score,
            streak_score: 0,
            penalty_score: if score >= PASS_FLOOR { 0.0 } else { PENALTY_STEP },
            total_time: time_spent,
            last_attempt_at: Some(now),
        },
        Some(prev) => {
            let streak_score = if score > prev.score {
                prev.streak_score + 1
            } else if score < prev.score {
                prev.streak_score - 1
            } else {
                prev.streak_score
            };

            let penalty_score = if score < PASS_FLOOR {
                prev.penalty_score + PENALTY_STEP
            } else {
                (prev.penalty_score - PENALTY_DECAY).max(0.0)
            };

            ProgressRecord {
                user_id: prev.user_id,
                word_id: prev.word_id.clone(),
                score,
                attempts: prev.attempts + 1,
                mastered: score >= mastery_threshold,
                moving_avg_score: round2((prev.moving_avg_score + score) / 2.0),
                streak_score,
                penalty_score,
                total_time: prev.total_time + time_spent,
                last_attempt_at: Some(now),
            }
        }
    }
}

/// Zero out a record's attempt history while preserving its identity.
pub fn reset(record: &ProgressRecord) -> ProgressRecord {
    ProgressRecord {
        user_id: record.user_id,
        word_id: record.word_id.clone(),
        score: 0.0,
        attempts: 0,
        mastered: false,
        moving_avg_score: 0.0,
        streak_score: 0,
        penalty_score: 0.0,
        total_time: 0.0,
        last_attempt_at: None,
    }
}
