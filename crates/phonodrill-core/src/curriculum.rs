//! Curriculum model and TOML loading.
//!
//! A curriculum is an ordered list of levels, each holding an ordered list
//! of words. Levels are consumed in file order by the recommendation
//! engine; word order within a level is the stable tie-breaker.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A practice word. Citation phonemes may be stored inline (raw ARPAbet,
/// stress digits allowed) or left for the phonemizer to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Stable identifier; progress records key on this.
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub phonemes: Option<Vec<String>>,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
}

impl Word {
    pub fn new(text: &str) -> Self {
        Word {
            id: text.trim().to_lowercase(),
            text: text.trim().to_string(),
            phonemes: None,
            difficulty: default_difficulty(),
        }
    }
}

fn default_difficulty() -> u8 {
    1
}

/// An ordered curriculum unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    /// Position in the curriculum; ascending order is consumption order.
    pub ordinal: u32,
    pub words: Vec<Word>,
}

/// The full ordered curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub levels: Vec<Level>,
}

impl Curriculum {
    /// Look up a level by name.
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// Look up a word anywhere in the curriculum by its id or text.
    pub fn find_word(&self, word: &str) -> Option<&Word> {
        let needle = word.trim().to_lowercase();
        self.levels
            .iter()
            .flat_map(|l| l.words.iter())
            .find(|w| w.id == needle || w.text.eq_ignore_ascii_case(word.trim()))
    }

    pub fn word_count(&self) -> usize {
        self.levels.iter().map(|l| l.words.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// TOML parsing
// ---------------------------------------------------------------------------

/// Intermediate TOML structure for curriculum files.
#[derive(Debug, Deserialize)]
struct TomlCurriculumFile {
    curriculum: TomlCurriculumHeader,
    #[serde(default)]
    levels: Vec<TomlLevel>,
}

#[derive(Debug, Deserialize)]
struct TomlCurriculumHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlLevel {
    name: String,
    #[serde(default)]
    words: Vec<TomlWord>,
}

/// A word is either a bare string or a table with phonemes/difficulty.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TomlWord {
    Text(String),
    Detailed {
        text: String,
        #[serde(default)]
        phonemes: Option<Vec<String>>,
        #[serde(default = "default_difficulty")]
        difficulty: u8,
    },
}

/// Parse a single TOML file into a `Curriculum`.
pub fn parse_curriculum(path: &Path) -> Result<Curriculum> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read curriculum file: {}", path.display()))?;
    parse_curriculum_str(&content, path)
}

/// Parse a TOML string into a `Curriculum` (useful for testing).
pub fn parse_curriculum_str(content: &str, source_path: &Path) -> Result<Curriculum> {
    let parsed: TomlCurriculumFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let levels = parsed
        .levels
        .into_iter()
        .enumerate()
        .map(|(ordinal, level)| {
            let words = level
                .words
                .into_iter()
                .map(|w| match w {
                    TomlWord::Text(text) => Word::new(&text),
                    TomlWord::Detailed {
                        text,
                        phonemes,
                        difficulty,
                    } => Word {
                        id: text.trim().to_lowercase(),
                        text: text.trim().to_string(),
                        phonemes,
                        difficulty,
                    },
                })
                .collect();
            Level {
                name: level.name,
                ordinal: ordinal as u32,
                words,
            }
        })
        .collect();

    Ok(Curriculum {
        id: parsed.curriculum.id,
        name: parsed.curriculum.name,
        description: parsed.curriculum.description,
        levels,
    })
}

/// Recursively load all `.toml` curriculum files from a directory.
pub fn load_curriculum_directory(dir: &Path) -> Result<Vec<Curriculum>> {
    let mut curricula = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            curricula.extend(load_curriculum_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_curriculum(&path) {
                Ok(curriculum) => curricula.push(curriculum),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(curricula)
}

/// A warning from curriculum validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The level name (if applicable).
    pub level: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a curriculum for common issues.
pub fn validate_curriculum(curriculum: &Curriculum) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if curriculum.levels.is_empty() {
        warnings.push(ValidationWarning {
            level: None,
            message: "curriculum has no levels".into(),
        });
    }

    // Duplicate level names break level lookup.
    let mut seen_levels = std::collections::HashSet::new();
    for level in &curriculum.levels {
        if !seen_levels.insert(&level.name) {
            warnings.push(ValidationWarning {
                level: Some(level.name.clone()),
                message: format!("duplicate level name: {}", level.name),
            });
        }
    }

    for level in &curriculum.levels {
        if level.words.is_empty() {
            warnings.push(ValidationWarning {
                level: Some(level.name.clone()),
                message: "level has no words and will be skipped".into(),
            });
        }

        let mut seen_words = std::collections::HashSet::new();
        for word in &level.words {
            if word.text.trim().is_empty() {
                warnings.push(ValidationWarning {
                    level: Some(level.name.clone()),
                    message: "empty word text".into(),
                });
            }
            if !seen_words.insert(&word.id) {
                warnings.push(ValidationWarning {
                    level: Some(level.name.clone()),
                    message: format!("duplicate word: {}", word.text),
                });
            }
            if let Some(phonemes) = &word.phonemes {
                if phonemes.is_empty() {
                    warnings.push(ValidationWarning {
                        level: Some(level.name.clone()),
                        message: format!("word '{}' declares an empty phoneme list", word.text),
                    });
                }
            }
        }
    }

    warnings
}
