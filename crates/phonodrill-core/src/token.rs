//! Phonetic token normalization and syllable segmentation.
//!
//! Tokens are ARPAbet-style phonemes. Comparison happens on a normalized
//! form (stress digits stripped, uppercased); the raw form with stress
//! markers is what syllable segmentation operates on.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single normalized phonetic unit.
///
/// Construction strips stress digits and uppercases, so `AH0`, `ah0` and
/// `AH` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Normalize a raw phoneme into a comparable token (e.g. `AH0` -> `AH`).
    pub fn new(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect::<String>()
            .to_uppercase();
        Token(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Token {
    fn from(raw: &str) -> Self {
        Token::new(raw)
    }
}

/// Normalize a whole sequence of raw phonemes.
pub fn normalize_all<I, S>(raw: I) -> Vec<Token>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|p| Token::new(p.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Group raw ARPAbet phonemes into syllables.
///
/// A stress digit on a vowel phoneme closes the current syllable, so
/// `["B", "AH0", "N", "AE1", "N", "AH0"]` becomes
/// `["B AH0", "N AE1", "N AH0"]`. A trailing consonant cluster forms its
/// own final group.
pub fn syllabify<S: AsRef<str>>(phones: &[S]) -> Vec<String> {
    let mut syllables = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for phone in phones {
        let phone = phone.as_ref();
        current.push(phone);
        if phone.chars().any(|c| c.is_ascii_digit()) {
            syllables.push(current.join(" "));
            current.clear();
        }
    }

    if !current.is_empty() {
        syllables.push(current.join(" "));
    }

    syllables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_strips_stress_and_uppercases() {
        assert_eq!(Token::new("AH0"), Token::new("AH"));
        assert_eq!(Token::new("ah0").as_str(), "AH");
        assert_eq!(Token::new(" eh1 ").as_str(), "EH");
    }

    #[test]
    fn token_display_uses_normalized_form() {
        assert_eq!(Token::new("IY2").to_string(), "IY");
    }

    #[test]
    fn normalize_all_drops_empty_tokens() {
        let tokens = normalize_all(["K", "AE1", "T", "  "]);
        assert_eq!(tokens, vec![Token::new("K"), Token::new("AE"), Token::new("T")]);
    }

    #[test]
    fn syllabify_groups_on_stress_digits() {
        let phones = ["B", "AH0", "N", "AE1", "N", "AH0"];
        assert_eq!(syllabify(&phones), vec!["B AH0", "N AE1", "N AH0"]);
    }

    #[test]
    fn syllabify_keeps_trailing_consonants() {
        let phones = ["K", "AE1", "T"];
        assert_eq!(syllabify(&phones), vec!["K AE1", "T"]);
    }

    #[test]
    fn syllabify_empty_input() {
        let phones: [&str; 0] = [];
        assert!(syllabify(&phones).is_empty());
    }

    #[test]
    fn token_serde_is_transparent() {
        let token = Token::new("AE1");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, "\"AE\"");
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }
}
