//! Sentence and word scoring.
//!
//! Two independent signals are produced for an attempt:
//!
//! - a phoneme score from one global alignment over the whole utterance
//!   (flat expected sequence vs. full observed sequence), broken down per
//!   word by expected-index attribution;
//! - a coarse character-level similarity ratio on the raw text, used as a
//!   sanity signal and for word-mode mistake classification.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::align::{align, AlignmentResult, EditKind};
use crate::round2;
use crate::token::Token;

/// Similarity above this is not a mistake at all.
const NEAR_MISS_CEILING: f64 = 80.0;
/// Similarity above this (but below the ceiling) is a near miss.
const NEAR_MISS_FLOOR: f64 = 60.0;

/// How a spoken word deviated from the expected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordMistake {
    NearMiss,
    MissingWord,
    ExtraPronunciation,
    Mispronounced,
}

impl fmt::Display for WordMistake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordMistake::NearMiss => write!(f, "near_miss"),
            WordMistake::MissingWord => write!(f, "missing_word"),
            WordMistake::ExtraPronunciation => write!(f, "extra_pronunciation"),
            WordMistake::Mispronounced => write!(f, "mispronounced"),
        }
    }
}

/// A phoneme-level error attributed to one word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhonemeMistake {
    pub kind: EditKind,
    pub expected: Token,
    /// `None` for deletions (the speaker skipped the phoneme).
    pub observed: Option<Token>,
}

/// Per-word metrics reconstructed from the sentence-level alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordBreakdown {
    pub word: String,
    pub phoneme_count: usize,
    pub matched_count: usize,
    /// `round(matched_count / phoneme_count * 100, 2)`, or 0.0 when the
    /// word has no phonemes.
    pub score: f64,
    pub mistakes: Vec<PhonemeMistake>,
}

/// Result of scoring a whole utterance against its expected phonemes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceScore {
    pub alignment: AlignmentResult,
    /// The alignment's phoneme score over the flat sequences — not an
    /// average of per-word scores.
    pub overall_score: f64,
    pub per_word: Vec<WordBreakdown>,
    /// Observed tokens the aligner could not attach to any expected word.
    pub insertions: Vec<Token>,
}

/// Split expected text into words. `?` and `!` are deleted, not treated
/// as separators, so `"what?no"` is a single word.
pub fn tokenize_sentence(text: &str) -> Vec<String> {
    text.replace(['?', '!'], "")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Score a sentence whose words have already been phonemized.
///
/// `words` pairs each expected word with its citation phoneme sequence.
/// A single alignment runs over the concatenated expected sequence so a
/// boundary error in one word can shift into its neighbours instead of
/// being forced to stay word-local.
pub fn score_sentence(words: &[(String, Vec<Token>)], observed: &[Token]) -> SentenceScore {
    let mut flat = Vec::new();
    let mut boundaries = Vec::with_capacity(words.len());
    for (_, phonemes) in words {
        let start = flat.len();
        flat.extend(phonemes.iter().cloned());
        boundaries.push((start, flat.len()));
    }

    let alignment = align(&flat, observed);

    let mut per_word: Vec<WordBreakdown> = words
        .iter()
        .map(|(word, _)| WordBreakdown {
            word: word.clone(),
            phoneme_count: 0,
            matched_count: 0,
            score: 0.0,
            mistakes: Vec::new(),
        })
        .collect();
    let mut insertions = Vec::new();

    // Walk the edit script, attributing each non-insertion op to the word
    // whose boundary range contains its expected-sequence index.
    let mut exp_index = 0usize;
    for op in &alignment.ops {
        match (op.kind, &op.expected, &op.observed) {
            (EditKind::Insertion, _, Some(obs)) => insertions.push(obs.clone()),
            (kind, Some(exp), obs) => {
                if let Some(word_idx) = boundaries
                    .iter()
                    .position(|&(start, end)| start <= exp_index && exp_index < end)
                {
                    let breakdown = &mut per_word[word_idx];
                    breakdown.phoneme_count += 1;
                    if kind == EditKind::Equal {
                        breakdown.matched_count += 1;
                    } else {
                        breakdown.mistakes.push(PhonemeMistake {
                            kind,
                            expected: exp.clone(),
                            observed: obs.clone(),
                        });
                    }
                }
                exp_index += 1;
            }
            _ => {}
        }
    }

    for breakdown in &mut per_word {
        breakdown.score = if breakdown.phoneme_count > 0 {
            round2(breakdown.matched_count as f64 / breakdown.phoneme_count as f64 * 100.0)
        } else {
            0.0
        };
    }

    SentenceScore {
        overall_score: alignment.phoneme_score,
        alignment,
        per_word,
        insertions,
    }
}

// ---------------------------------------------------------------------------
// Text similarity (no phonemes involved)
// ---------------------------------------------------------------------------

/// Character-level similarity between two strings, 0–100.
///
/// Classic ratio of matched characters found via recursive
/// longest-matching-block decomposition: `2 * M / (len(a) + len(b))`.
/// Returns 0.0 when `spoken` is empty.
pub fn similarity_ratio(expected: &str, spoken: &str) -> f64 {
    let spoken = spoken.trim().to_lowercase();
    if spoken.is_empty() {
        return 0.0;
    }
    let expected = expected.trim().to_lowercase();

    let a: Vec<char> = expected.chars().collect();
    let b: Vec<char> = spoken.chars().collect();
    let matches = matching_chars(&a, &b, 0, a.len(), 0, b.len());

    round2(2.0 * matches as f64 / (a.len() + b.len()) as f64 * 100.0)
}

fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
    if size == 0 {
        return 0;
    }
    size + matching_chars(a, b, alo, i, blo, j) + matching_chars(a, b, i + size, ahi, j + size, bhi)
}

/// Find the longest block `a[i..i+size] == b[j..j+size]` within the given
/// windows, preferring the earliest block on ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut b_positions: HashMap<char, Vec<usize>> = HashMap::new();
    for j in blo..bhi {
        b_positions.entry(b[j]).or_default().push(j);
    }

    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);
    let mut run_lengths: HashMap<usize, usize> = HashMap::new();

    for i in alo..ahi {
        let mut new_runs: HashMap<usize, usize> = HashMap::new();
        if let Some(positions) = b_positions.get(&a[i]) {
            for &j in positions {
                let prev = if j == 0 {
                    0
                } else {
                    run_lengths.get(&(j - 1)).copied().unwrap_or(0)
                };
                let size = prev + 1;
                new_runs.insert(j, size);
                if size > best_size {
                    best_i = i + 1 - size;
                    best_j = j + 1 - size;
                    best_size = size;
                }
            }
        }
        run_lengths = new_runs;
    }

    (best_i, best_j, best_size)
}

// ---------------------------------------------------------------------------
// Word-mode comparison (positional, for word-token ASR output)
// ---------------------------------------------------------------------------

/// Compare one expected word against what was spoken at its position.
pub fn compare_words(expected: &str, spoken: &str) -> (f64, Option<WordMistake>) {
    let expected_clean = expected.trim().to_lowercase();
    let spoken_clean = spoken.trim().to_lowercase();

    if expected_clean == spoken_clean {
        return (100.0, None);
    }
    if spoken_clean.is_empty() {
        return (0.0, Some(WordMistake::MissingWord));
    }

    let score = similarity_ratio(&expected_clean, &spoken_clean);
    let mistake = if score > NEAR_MISS_CEILING {
        None
    } else if score > NEAR_MISS_FLOOR {
        Some(WordMistake::NearMiss)
    } else if spoken_clean.chars().count() > expected_clean.chars().count() {
        Some(WordMistake::ExtraPronunciation)
    } else {
        Some(WordMistake::Mispronounced)
    };

    (score, mistake)
}

/// One row of the positional word-mode breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordComparison {
    pub expected: String,
    pub spoken: String,
    pub score: f64,
    pub mistake: Option<WordMistake>,
}

/// Positional per-word analysis of a recognized sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordModeAnalysis {
    pub avg_word_score: f64,
    pub breakdown: Vec<WordComparison>,
}

/// Compare expected vs. recognized text word-by-word at matching positions.
///
/// Words past the end of the shorter side compare against the empty string,
/// yielding `missing_word` or `extra_pronunciation` entries.
pub fn analyze_words(expected_sentence: &str, recognized_sentence: &str) -> WordModeAnalysis {
    let expected_words = tokenize_sentence(expected_sentence);
    let recognized_words: Vec<String> = recognized_sentence
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let max_len = expected_words.len().max(recognized_words.len());
    let mut breakdown = Vec::with_capacity(max_len);

    for i in 0..max_len {
        let expected = expected_words.get(i).map(String::as_str).unwrap_or("");
        let spoken = recognized_words.get(i).map(String::as_str).unwrap_or("");
        let (score, mistake) = compare_words(expected, spoken);
        breakdown.push(WordComparison {
            expected: expected.to_string(),
            spoken: spoken.to_string(),
            score,
            mistake,
        });
    }

    let avg_word_score = if breakdown.is_empty() {
        0.0
    } else {
        round2(breakdown.iter().map(|w| w.score).sum::<f64>() / breakdown.len() as f64)
    };

    WordModeAnalysis {
        avg_word_score,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(raw: &[&str]) -> Vec<Token> {
        raw.iter().map(|r| Token::new(r)).collect()
    }

    fn phonemized(words: &[(&str, &[&str])]) -> Vec<(String, Vec<Token>)> {
        words
            .iter()
            .map(|(w, ph)| (w.to_string(), toks(ph)))
            .collect()
    }

    #[test]
    fn tokenize_strips_punctuation() {
        assert_eq!(
            tokenize_sentence("did you eat?!"),
            vec!["did", "you", "eat"]
        );
        assert!(tokenize_sentence("  ").is_empty());
    }

    #[test]
    fn tokenize_deletes_punctuation_without_splitting() {
        // Deletion, not substitution: punctuation inside a word does not
        // create a word boundary.
        assert_eq!(tokenize_sentence("what?no"), vec!["whatno"]);
        assert!(tokenize_sentence("?!").is_empty());
    }

    #[test]
    fn perfect_single_word() {
        let words = phonemized(&[("cat", &["K", "AE", "T"])]);
        let result = score_sentence(&words, &toks(&["K", "AE", "T"]));

        assert_eq!(result.overall_score, 100.0);
        assert_eq!(result.per_word.len(), 1);
        assert_eq!(result.per_word[0].score, 100.0);
        assert_eq!(result.per_word[0].phoneme_count, 3);
        assert_eq!(result.per_word[0].matched_count, 3);
        assert!(result.per_word[0].mistakes.is_empty());
        assert!(result.insertions.is_empty());
    }

    #[test]
    fn single_substitution_in_word() {
        let words = phonemized(&[("cat", &["K", "AE", "T"])]);
        let result = score_sentence(&words, &toks(&["K", "EH", "T"]));

        assert_eq!(result.overall_score, 66.67);
        assert_eq!(result.per_word[0].score, 66.67);
        assert_eq!(result.per_word[0].mistakes.len(), 1);
        assert_eq!(result.per_word[0].mistakes[0].kind, EditKind::Substitution);
        assert_eq!(result.per_word[0].mistakes[0].expected, Token::new("AE"));
    }

    #[test]
    fn errors_attributed_to_the_right_word() {
        let words = phonemized(&[("the", &["DH", "AH"]), ("cat", &["K", "AE", "T"])]);
        // "the" fine, "cat" missing its vowel entirely.
        let result = score_sentence(&words, &toks(&["DH", "AH", "K", "T"]));

        assert_eq!(result.per_word[0].word, "the");
        assert_eq!(result.per_word[0].score, 100.0);

        assert_eq!(result.per_word[1].word, "cat");
        assert_eq!(result.per_word[1].phoneme_count, 3);
        assert_eq!(result.per_word[1].matched_count, 2);
        assert_eq!(result.per_word[1].mistakes.len(), 1);
        assert_eq!(result.per_word[1].mistakes[0].kind, EditKind::Deletion);
    }

    #[test]
    fn insertions_reported_but_not_counted() {
        let words = phonemized(&[("cat", &["K", "AE", "T"])]);
        let result = score_sentence(&words, &toks(&["K", "AE", "T", "S"]));

        assert_eq!(result.insertions, vec![Token::new("S")]);
        assert_eq!(result.per_word[0].phoneme_count, 3);
        assert_eq!(result.per_word[0].score, 100.0);
        // Overall score still pays for the insertion: 3 matches over 4 ops.
        assert_eq!(result.overall_score, 75.0);
    }

    #[test]
    fn word_with_no_phonemes_scores_zero() {
        let words = phonemized(&[("", &[]), ("cat", &["K", "AE", "T"])]);
        let result = score_sentence(&words, &toks(&["K", "AE", "T"]));
        assert_eq!(result.per_word[0].score, 0.0);
        assert_eq!(result.per_word[0].phoneme_count, 0);
        assert_eq!(result.per_word[1].score, 100.0);
    }

    #[test]
    fn empty_everything_is_score_zero_not_error() {
        let result = score_sentence(&[], &[]);
        assert_eq!(result.overall_score, 0.0);
        assert!(result.per_word.is_empty());
    }

    #[test]
    fn idempotent_for_identical_inputs() {
        let words = phonemized(&[("did", &["D", "IH", "D"]), ("you", &["Y", "UW"])]);
        let observed = toks(&["D", "IH", "Y", "UW"]);
        let first = score_sentence(&words, &observed);
        let second = score_sentence(&words, &observed);
        assert_eq!(first, second);
    }

    #[test]
    fn similarity_of_identical_strings() {
        assert_eq!(similarity_ratio("cat", "cat"), 100.0);
        assert_eq!(similarity_ratio("Cat", " cat "), 100.0);
    }

    #[test]
    fn similarity_of_empty_spoken_is_zero() {
        assert_eq!(similarity_ratio("cat", ""), 0.0);
        assert_eq!(similarity_ratio("cat", "   "), 0.0);
    }

    #[test]
    fn similarity_known_values() {
        // "cat" vs "bat": one matched block "at", ratio 2*2/6.
        assert_eq!(similarity_ratio("cat", "bat"), 66.67);
        // "apple" vs "aple": blocks "ple" and "a", ratio 2*4/9.
        assert_eq!(similarity_ratio("apple", "aple"), 88.89);
    }

    #[test]
    fn compare_words_classification() {
        assert_eq!(compare_words("cat", "cat"), (100.0, None));
        assert_eq!(
            compare_words("cat", ""),
            (0.0, Some(WordMistake::MissingWord))
        );

        let (_, mistake) = compare_words("pronunciation", "pronunciations");
        assert_eq!(mistake, None); // > 80 similarity

        let (score, mistake) = compare_words("cat", "bat");
        assert_eq!(score, 66.67);
        assert_eq!(mistake, Some(WordMistake::NearMiss));

        let (_, mistake) = compare_words("cat", "dogmatic");
        assert_eq!(mistake, Some(WordMistake::ExtraPronunciation));

        let (_, mistake) = compare_words("elephant", "ant");
        assert_eq!(mistake, Some(WordMistake::Mispronounced));
    }

    #[test]
    fn analyze_words_positional() {
        let analysis = analyze_words("the cat sat", "the bat");
        assert_eq!(analysis.breakdown.len(), 3);
        assert_eq!(analysis.breakdown[0].score, 100.0);
        assert_eq!(analysis.breakdown[1].mistake, Some(WordMistake::NearMiss));
        assert_eq!(
            analysis.breakdown[2].mistake,
            Some(WordMistake::MissingWord)
        );
        let expected_avg: f64 = (100.0 + 66.67 + 0.0) / 3.0;
        assert!((analysis.avg_word_score - (expected_avg * 100.0).round() / 100.0).abs() < 1e-9);
    }

    #[test]
    fn analyze_words_empty_inputs() {
        let analysis = analyze_words("", "");
        assert_eq!(analysis.avg_word_score, 0.0);
        assert!(analysis.breakdown.is_empty());
    }

    #[test]
    fn word_mistake_display() {
        assert_eq!(WordMistake::NearMiss.to_string(), "near_miss");
        assert_eq!(WordMistake::MissingWord.to_string(), "missing_word");
        assert_eq!(
            WordMistake::ExtraPronunciation.to_string(),
            "extra_pronunciation"
        );
        assert_eq!(WordMistake::Mispronounced.to_string(), "mispronounced");
    }
}
