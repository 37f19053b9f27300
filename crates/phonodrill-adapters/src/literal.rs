//! Literal phonemizer for dictionary-less setups.

use async_trait::async_trait;

use phonodrill_core::token::Token;
use phonodrill_core::traits::Phonemizer;

/// Maps every word to a single token equal to the word itself.
///
/// With this adapter, phoneme scoring degenerates to whole-word matching.
/// It keeps text-only practice (word mode, recommendations, progress)
/// usable when no pronunciation dictionary is configured.
#[derive(Debug, Default)]
pub struct LiteralPhonemizer;

#[async_trait]
impl Phonemizer for LiteralPhonemizer {
    fn name(&self) -> &str {
        "literal"
    }

    async fn phonemes_for(&self, word: &str) -> anyhow::Result<Vec<Token>> {
        Ok(vec![Token::new(word)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn word_becomes_one_token() {
        let phonemizer = LiteralPhonemizer;
        let tokens = phonemizer.phonemes_for("cat").await.unwrap();
        assert_eq!(tokens, vec![Token::new("CAT")]);
    }
}
