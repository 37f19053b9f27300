//! Next-word recommendation.
//!
//! Two selectable policies exist because callers depend on both behaviors:
//!
//! - [`RecommendPolicy::TwoTier`] walks the whole curriculum level by
//!   level: unattempted words first, then the lowest-scoring unmastered
//!   word; a level must be fully mastered before the walk advances.
//! - [`RecommendPolicy::WeightedPriority`] is level-scoped: every word gets
//!   a priority from its score, penalty, and moving average, and the level
//!   counts as complete once 80% of its words are mastered.
//!
//! Both are deterministic: stored word order breaks ties.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::curriculum::{Curriculum, Level};
use crate::progress::{ProgressRecord, PASS_FLOOR};

/// Priority assigned to words with no progress record under the weighted
/// policy; attempted words usually rank below this unless heavily
/// penalized.
const UNATTEMPTED_PRIORITY: f64 = 1.0;
/// Pushed onto mastered words so they sort behind everything else.
const MASTERED_PRIORITY_OFFSET: f64 = 10.0;
/// Fraction of a level's words that must be mastered for the weighted
/// policy to call the level complete.
const LEVEL_COMPLETE_RATIO: f64 = 0.8;

/// Which recommendation strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendPolicy {
    TwoTier,
    WeightedPriority,
}

impl fmt::Display for RecommendPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendPolicy::TwoTier => write!(f, "two_tier"),
            RecommendPolicy::WeightedPriority => write!(f, "weighted_priority"),
        }
    }
}

impl FromStr for RecommendPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "two_tier" | "two-tier" => Ok(RecommendPolicy::TwoTier),
            "weighted_priority" | "weighted-priority" | "adaptive" => {
                Ok(RecommendPolicy::WeightedPriority)
            }
            other => Err(format!("unknown recommendation policy: {other}")),
        }
    }
}

/// Why a word was recommended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendReason {
    /// Not attempted yet.
    NewWord,
    /// Lowest score in the level, needs improvement.
    LowestScore,
    /// Attempted and scoring under the pass floor.
    Weak,
    /// Attempted with a middling score.
    Medium,
}

impl fmt::Display for RecommendReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecommendReason::NewWord => write!(f, "new_word"),
            RecommendReason::LowestScore => write!(f, "lowest_score"),
            RecommendReason::Weak => write!(f, "weak"),
            RecommendReason::Medium => write!(f, "medium"),
        }
    }
}

/// The outcome of a recommendation query. Always a structured value, never
/// a panic or bare error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Recommendation {
    /// Practice this word next.
    Practice {
        level: String,
        word: String,
        reason: RecommendReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        priority: Option<f64>,
    },
    /// The queried level is complete (weighted policy only).
    LevelComplete {
        level: String,
        mastered: usize,
        total: usize,
    },
    /// Every level in the curriculum is mastered.
    AllMastered,
    /// No recommendation can be made (no levels, unknown level, ...).
    Unavailable { reason: String },
}

/// Walk the curriculum in level order and pick the next word (two-tier
/// policy). Mastery is judged on each record's latest score against the
/// threshold.
pub fn recommend_next(
    curriculum: &Curriculum,
    progress: &HashMap<String, ProgressRecord>,
    mastery_threshold: f64,
) -> Recommendation {
    if curriculum.levels.is_empty() {
        return Recommendation::Unavailable {
            reason: "no levels configured".into(),
        };
    }

    for level in &curriculum.levels {
        if level.words.is_empty() {
            continue;
        }

        let mastered = level
            .words
            .iter()
            .filter(|w| {
                progress
                    .get(&w.id)
                    .is_some_and(|p| p.score >= mastery_threshold)
            })
            .count();

        if mastered == level.words.len() {
            // Level fully mastered; move on.
            continue;
        }

        // 1. Prefer completely new words, in stored order.
        if let Some(word) = level.words.iter().find(|w| !progress.contains_key(&w.id)) {
            return Recommendation::Practice {
                level: level.name.clone(),
                word: word.text.clone(),
                reason: RecommendReason::NewWord,
                score: None,
                priority: None,
            };
        }

        // 2. Otherwise the weakest unmastered word; stored order breaks
        //    score ties.
        let mut weakest: Option<(&str, f64)> = None;
        for word in &level.words {
            if let Some(record) = progress.get(&word.id) {
                if record.score < mastery_threshold
                    && weakest.map_or(true, |(_, best)| record.score < best)
                {
                    weakest = Some((&word.text, record.score));
                }
            }
        }
        if let Some((word, score)) = weakest {
            return Recommendation::Practice {
                level: level.name.clone(),
                word: word.to_string(),
                reason: RecommendReason::LowestScore,
                score: Some(score),
                priority: None,
            };
        }
    }

    Recommendation::AllMastered
}

/// Rank one level's words by weighted priority and pick the most urgent
/// (weighted-priority policy).
pub fn adaptive_next(level: &Level, progress: &HashMap<String, ProgressRecord>) -> Recommendation {
    if level.words.is_empty() {
        return Recommendation::Unavailable {
            reason: format!("no words in level {}", level.name),
        };
    }

    let mastered = level
        .words
        .iter()
        .filter(|w| progress.get(&w.id).is_some_and(|p| p.mastered))
        .count();
    let total = level.words.len();

    if mastered as f64 >= LEVEL_COMPLETE_RATIO * total as f64 {
        return Recommendation::LevelComplete {
            level: level.name.clone(),
            mastered,
            total,
        };
    }

    let mut best: Option<(&str, f64, RecommendReason, f64)> = None;
    for word in &level.words {
        let (priority, reason, score) = match progress.get(&word.id) {
            None => (UNATTEMPTED_PRIORITY, RecommendReason::NewWord, 0.0),
            Some(record) => {
                let weighted = (1.0 - record.score / 100.0) * 0.5
                    + record.penalty_score * 0.3
                    + (1.0 - record.moving_avg_score / 100.0) * 0.2;
                let priority = if record.mastered {
                    weighted + MASTERED_PRIORITY_OFFSET
                } else {
                    weighted
                };
                let reason = if record.score < PASS_FLOOR {
                    RecommendReason::Weak
                } else {
                    RecommendReason::Medium
                };
                (priority, reason, record.score)
            }
        };

        // Strictly-less keeps the first word on ties (stored order).
        if best.map_or(true, |(_, best_priority, _, _)| priority < best_priority) {
            best = Some((&word.text, priority, reason, score));
        }
    }

    match best {
        Some((word, priority, reason, score)) => Recommendation::Practice {
            level: level.name.clone(),
            word: word.to_string(),
            reason,
            score: Some(score),
            priority: Some(priority),
        },
        // Unreachable with a non-empty word list, but never panic here.
        None => Recommendation::Unavailable {
            reason: format!("no candidates in level {}", level.name),
        },
    }
}
