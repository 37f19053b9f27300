//! CMU-style pronunciation dictionary phonemizer.
//!
//! Parses the plain-text `word  PH0 PH1 ...` format used by the CMU
//! Pronouncing Dictionary. Lookup keys are lowercased; alternate
//! pronunciations (`word(2)`) beyond the first are ignored. Stored
//! phones keep their stress digits so syllable grouping stays possible;
//! the `Phonemizer` impl strips them.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use phonodrill_core::token::{normalize_all, syllabify, Token};
use phonodrill_core::traits::Phonemizer;

use crate::error::AdapterError;

/// Dictionary-backed phonemizer with a literal-token fallback for words
/// the dictionary does not carry.
#[derive(Debug)]
pub struct CmuDictPhonemizer {
    /// Lowercased word to raw phones, stress digits intact.
    entries: HashMap<String, Vec<String>>,
}

impl CmuDictPhonemizer {
    /// Load a dictionary file.
    pub fn load(path: &Path) -> Result<Self, AdapterError> {
        let content =
            std::fs::read_to_string(path).map_err(|source| AdapterError::DictionaryRead {
                path: path.to_path_buf(),
                source,
            })?;
        Self::parse(&content, path)
    }

    /// Parse dictionary text. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, AdapterError> {
        let mut entries = HashMap::new();

        for (idx, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let phones: Vec<String> = parts.map(str::to_string).collect();
            if phones.is_empty() {
                return Err(AdapterError::MalformedEntry {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    content: line.to_string(),
                });
            }

            // "word(2)" marks an alternate pronunciation; keep the first.
            if word.ends_with(')') {
                continue;
            }

            entries.insert(word.to_lowercase(), phones);
        }

        debug!("loaded {} dictionary entries", entries.len());
        Ok(Self { entries })
    }

    /// An empty dictionary; every lookup falls back to literal tokens.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&word.to_lowercase())
    }

    /// Raw phones with stress digits, if the word is in the dictionary.
    pub fn raw_phones(&self, word: &str) -> Option<&[String]> {
        self.entries.get(&word.to_lowercase()).map(Vec::as_slice)
    }

    /// Phones grouped into syllables on vowel stress markers.
    pub fn syllables_for(&self, word: &str) -> Option<Vec<String>> {
        self.raw_phones(word).map(syllabify)
    }
}

#[async_trait]
impl Phonemizer for CmuDictPhonemizer {
    fn name(&self) -> &str {
        "cmudict"
    }

    async fn phonemes_for(&self, word: &str) -> anyhow::Result<Vec<Token>> {
        match self.raw_phones(word) {
            Some(phones) => Ok(normalize_all(phones)),
            None => {
                debug!("no dictionary entry for '{word}', using literal token");
                Ok(vec![Token::new(word)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DICT: &str = "\
;;; comment header
cat  K AE1 T
dog  D AO1 G
read  R IY1 D
read(2)  R EH1 D
water  W AO1 T ER0
";

    fn dict() -> CmuDictPhonemizer {
        CmuDictPhonemizer::parse(DICT, Path::new("test.dict")).unwrap()
    }

    #[test]
    fn parses_entries_and_skips_comments() {
        let d = dict();
        assert_eq!(d.len(), 4);
        assert!(d.contains("cat"));
        assert!(d.contains("CAT"));
        assert!(!d.contains("zebra"));
    }

    #[test]
    fn alternates_keep_the_first_pronunciation() {
        let d = dict();
        assert_eq!(
            d.raw_phones("read").unwrap(),
            &["R".to_string(), "IY1".into(), "D".into()]
        );
    }

    #[test]
    fn malformed_entry_names_the_line() {
        let err = CmuDictPhonemizer::parse("cat\n", Path::new("bad.dict")).unwrap_err();
        match err {
            AdapterError::MalformedEntry { line, .. } => assert_eq!(line, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn lookup_strips_stress() {
        let d = dict();
        let phonemes = d.phonemes_for("water").await.unwrap();
        let raw: Vec<&str> = phonemes.iter().map(|t| t.as_str()).collect();
        assert_eq!(raw, vec!["W", "AO", "T", "ER"]);
    }

    #[tokio::test]
    async fn unknown_word_falls_back_to_literal_token() {
        let d = dict();
        let phonemes = d.phonemes_for("zebra").await.unwrap();
        assert_eq!(phonemes, vec![Token::new("zebra")]);
    }

    #[test]
    fn syllables_group_on_stress_digits() {
        let d = dict();
        assert_eq!(
            d.syllables_for("water").unwrap(),
            vec!["W AO1".to_string(), "T ER0".into()]
        );
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(CmuDictPhonemizer::load(Path::new("no/such.dict")).is_err());
    }
}
