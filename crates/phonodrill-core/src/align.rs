//! Global phoneme sequence alignment.
//!
//! Needleman–Wunsch style dynamic programming over two token sequences,
//! producing an edit script (equal / substitution / insertion / deletion)
//! and a normalized 0–100 score. Sequences are phoneme counts of a single
//! word or short sentence, so the O(n·m) matrix is small.

use serde::{Deserialize, Serialize};

use crate::round2;
use crate::token::Token;

/// Score for two identical tokens on the diagonal.
pub const MATCH_SCORE: i32 = 2;
/// Score for a mismatched diagonal step.
pub const SUB_SCORE: i32 = -1;
/// Score for a gap (insertion or deletion).
pub const GAP_SCORE: i32 = -1;

/// One step of the alignment edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    Equal,
    Substitution,
    /// An observed token with no expected counterpart.
    Insertion,
    /// An expected token the speaker never produced.
    Deletion,
}

/// A single aligned pair. Insertions carry no expected token and deletions
/// carry no observed token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOp {
    pub kind: EditKind,
    pub expected: Option<Token>,
    pub observed: Option<Token>,
}

/// The full alignment between an expected and an observed sequence.
///
/// Invariants: the number of non-insertion ops equals the expected length,
/// and the number of non-deletion ops equals the observed length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub ops: Vec<EditOp>,
    /// `round(matches / total_ops * 100, 2)`; 0.0 for an empty alignment.
    pub phoneme_score: f64,
}

impl AlignmentResult {
    /// Number of `Equal` ops in the edit script.
    pub fn matches(&self) -> usize {
        self.ops.iter().filter(|op| op.kind == EditKind::Equal).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Step {
    Start,
    Diag,
    Up,
    Left,
}

/// Align `expected` against `observed`.
///
/// Tie-break order when recurrence branches score equally: diagonal, then
/// up (deletion), then left (insertion). This ordering is load-bearing —
/// it decides which ops get reported on equal-scoring paths.
pub fn align(expected: &[Token], observed: &[Token]) -> AlignmentResult {
    let n = expected.len();
    let m = observed.len();

    let mut dp = vec![vec![0i32; m + 1]; n + 1];
    let mut ptr = vec![vec![Step::Start; m + 1]; n + 1];

    for i in 1..=n {
        dp[i][0] = dp[i - 1][0] + GAP_SCORE;
        ptr[i][0] = Step::Up;
    }
    for j in 1..=m {
        dp[0][j] = dp[0][j - 1] + GAP_SCORE;
        ptr[0][j] = Step::Left;
    }

    for i in 1..=n {
        for j in 1..=m {
            let diag = dp[i - 1][j - 1]
                + if expected[i - 1] == observed[j - 1] {
                    MATCH_SCORE
                } else {
                    SUB_SCORE
                };
            let up = dp[i - 1][j] + GAP_SCORE;
            let left = dp[i][j - 1] + GAP_SCORE;

            let best = diag.max(up).max(left);
            dp[i][j] = best;
            ptr[i][j] = if best == diag {
                Step::Diag
            } else if best == up {
                Step::Up
            } else {
                Step::Left
            };
        }
    }

    // Backtrace from the bottom-right corner, then reverse into
    // left-to-right order.
    let mut ops = Vec::with_capacity(n + m);
    let mut matches = 0usize;
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        match ptr[i][j] {
            Step::Diag => {
                let exp = &expected[i - 1];
                let obs = &observed[j - 1];
                let kind = if exp == obs {
                    matches += 1;
                    EditKind::Equal
                } else {
                    EditKind::Substitution
                };
                ops.push(EditOp {
                    kind,
                    expected: Some(exp.clone()),
                    observed: Some(obs.clone()),
                });
                i -= 1;
                j -= 1;
            }
            Step::Up => {
                ops.push(EditOp {
                    kind: EditKind::Deletion,
                    expected: Some(expected[i - 1].clone()),
                    observed: None,
                });
                i -= 1;
            }
            Step::Left => {
                ops.push(EditOp {
                    kind: EditKind::Insertion,
                    expected: None,
                    observed: Some(observed[j - 1].clone()),
                });
                j -= 1;
            }
            Step::Start => break,
        }
    }

    ops.reverse();

    let total = ops.len();
    let phoneme_score = if total > 0 {
        round2(matches as f64 / total as f64 * 100.0)
    } else {
        0.0
    };

    AlignmentResult { ops, phoneme_score }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(raw: &[&str]) -> Vec<Token> {
        raw.iter().map(|r| Token::new(r)).collect()
    }

    #[test]
    fn identical_sequences_score_100() {
        let seq = toks(&["K", "AE", "T"]);
        let result = align(&seq, &seq);
        assert_eq!(result.phoneme_score, 100.0);
        assert_eq!(result.ops.len(), 3);
        assert!(result.ops.iter().all(|op| op.kind == EditKind::Equal));
    }

    #[test]
    fn single_substitution() {
        let expected = toks(&["K", "AE", "T"]);
        let observed = toks(&["K", "EH", "T"]);
        let result = align(&expected, &observed);

        let subs: Vec<_> = result
            .ops
            .iter()
            .filter(|op| op.kind == EditKind::Substitution)
            .collect();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].expected, Some(Token::new("AE")));
        assert_eq!(subs[0].observed, Some(Token::new("EH")));
        assert_eq!(result.phoneme_score, 66.67);
    }

    #[test]
    fn empty_both_sides() {
        let result = align(&[], &[]);
        assert!(result.ops.is_empty());
        assert_eq!(result.phoneme_score, 0.0);
    }

    #[test]
    fn empty_expected_is_all_insertions() {
        let observed = toks(&["AH", "B"]);
        let result = align(&[], &observed);
        assert_eq!(result.ops.len(), 2);
        assert!(result.ops.iter().all(|op| op.kind == EditKind::Insertion));
        assert_eq!(result.phoneme_score, 0.0);
    }

    #[test]
    fn empty_observed_is_all_deletions() {
        let expected = toks(&["AH", "B"]);
        let result = align(&expected, &[]);
        assert_eq!(result.ops.len(), 2);
        assert!(result.ops.iter().all(|op| op.kind == EditKind::Deletion));
        assert_eq!(result.phoneme_score, 0.0);
    }

    #[test]
    fn op_count_invariants() {
        let expected = toks(&["DH", "AH", "K", "AE", "T"]);
        let observed = toks(&["DH", "K", "AE", "T", "S"]);
        let result = align(&expected, &observed);

        let non_insertions = result
            .ops
            .iter()
            .filter(|op| op.kind != EditKind::Insertion)
            .count();
        let non_deletions = result
            .ops
            .iter()
            .filter(|op| op.kind != EditKind::Deletion)
            .count();
        assert_eq!(non_insertions, expected.len());
        assert_eq!(non_deletions, observed.len());
    }

    #[test]
    fn equal_count_symmetric_under_swap() {
        // Op labels may flip between insertion and deletion when the inputs
        // swap, but the match count must not change.
        let a = toks(&["K", "AE", "T", "S"]);
        let b = toks(&["K", "EH", "T"]);
        let forward = align(&a, &b);
        let backward = align(&b, &a);
        assert_eq!(forward.matches(), backward.matches());
    }

    #[test]
    fn prefers_diagonal_on_ties() {
        // One token each, different: diagonal substitution and a
        // deletion+insertion pair both score -1. The diagonal must win.
        let expected = toks(&["K"]);
        let observed = toks(&["T"]);
        let result = align(&expected, &observed);
        assert_eq!(result.ops.len(), 1);
        assert_eq!(result.ops[0].kind, EditKind::Substitution);
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let expected = toks(&["P", "R", "AH", "N", "AW", "N", "S"]);
        let observed = toks(&["P", "R", "N", "AW", "N", "S", "T"]);
        let first = align(&expected, &observed);
        let second = align(&expected, &observed);
        assert_eq!(first, second);
    }
}
