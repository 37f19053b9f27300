//! phonodrill-core — Pronunciation scoring and adaptive progression engine.
//!
//! This crate defines the fundamental data model, collaborator traits, and
//! scoring logic that the entire phonodrill system builds on: phoneme
//! alignment, sentence/word scoring, the per-word mastery state machine, and
//! the next-word recommendation policies.

pub mod align;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod progress;
pub mod recommend;
pub mod report;
pub mod scorer;
pub mod summary;
pub mod token;
pub mod traits;

/// Round to two decimal places, matching the precision every reported
/// percentage in this crate uses.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
