//! Attempt report with JSON persistence.
//!
//! Everything a caller needs to explain one scored attempt: what was
//! expected, what was heard, the full alignment and breakdown, and the
//! progress record the attempt produced.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::progress::ProgressRecord;
use crate::scorer::SentenceScore;
use crate::token::Token;

/// A complete record of one scored attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the attempt was scored.
    pub created_at: DateTime<Utc>,
    pub user_id: Uuid,
    /// The expected text as given.
    pub expected: String,
    /// Observed phoneme tokens from the recognizer.
    pub observed: Vec<Token>,
    /// Alignment, overall score, and per-word breakdown.
    pub result: SentenceScore,
    /// Companion character-level similarity on raw text, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_similarity: Option<f64>,
    /// Recognizer confidence, when reported.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// The progress record after this attempt was folded in.
    pub progress: ProgressRecord,
}

impl AttemptReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: AttemptReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
