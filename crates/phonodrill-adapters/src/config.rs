//! Application configuration and phonemizer factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use phonodrill_core::progress::MASTERY_THRESHOLD;
use phonodrill_core::recommend::RecommendPolicy;
use phonodrill_core::traits::Phonemizer;

use crate::cmudict::CmuDictPhonemizer;
use crate::literal::LiteralPhonemizer;

/// Configuration for the phonemizer adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PhonemizerConfig {
    /// CMU-style pronunciation dictionary file.
    Cmudict { path: PathBuf },
    /// No dictionary; every word maps to a single literal token.
    Literal,
}

impl Default for PhonemizerConfig {
    fn default() -> Self {
        PhonemizerConfig::Literal
    }
}

/// Top-level phonodrill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhonodrillConfig {
    /// Phonemizer adapter to use.
    #[serde(default)]
    pub phonemizer: PhonemizerConfig,
    /// Directory of curriculum TOML files.
    #[serde(default = "default_curriculum_dir")]
    pub curriculum_dir: PathBuf,
    /// JSON progress store path.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Score at or above which a word counts as mastered.
    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: f64,
    /// Recommendation policy for `next`.
    #[serde(default = "default_policy")]
    pub policy: RecommendPolicy,
    /// Retries when a progress write loses a concurrent update race.
    #[serde(default = "default_conflict_retries")]
    pub max_conflict_retries: u32,
}

fn default_curriculum_dir() -> PathBuf {
    PathBuf::from("./curricula")
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./phonodrill-progress.json")
}
fn default_mastery_threshold() -> f64 {
    MASTERY_THRESHOLD
}
fn default_policy() -> RecommendPolicy {
    RecommendPolicy::TwoTier
}
fn default_conflict_retries() -> u32 {
    3
}

impl Default for PhonodrillConfig {
    fn default() -> Self {
        Self {
            phonemizer: PhonemizerConfig::default(),
            curriculum_dir: default_curriculum_dir(),
            store_path: default_store_path(),
            mastery_threshold: default_mastery_threshold(),
            policy: default_policy(),
            max_conflict_retries: default_conflict_retries(),
        }
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `phonodrill.toml` in the current directory
/// 2. `~/.config/phonodrill/config.toml`
///
/// Environment variable override: `PHONODRILL_DICT` points at a
/// dictionary file and wins over the configured phonemizer.
pub fn load_config() -> Result<PhonodrillConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<PhonodrillConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("phonodrill.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<PhonodrillConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => PhonodrillConfig::default(),
    };

    if let Ok(dict) = std::env::var("PHONODRILL_DICT") {
        config.phonemizer = PhonemizerConfig::Cmudict {
            path: PathBuf::from(dict),
        };
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("phonodrill"))
}

/// Create a phonemizer instance from its configuration.
pub fn create_phonemizer(config: &PhonemizerConfig) -> Result<Arc<dyn Phonemizer>> {
    match config {
        PhonemizerConfig::Cmudict { path } => {
            let dict = CmuDictPhonemizer::load(path)
                .with_context(|| format!("failed to load dictionary: {}", path.display()))?;
            Ok(Arc::new(dict))
        }
        PhonemizerConfig::Literal => Ok(Arc::new(LiteralPhonemizer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = PhonodrillConfig::default();
        assert_eq!(config.mastery_threshold, 80.0);
        assert_eq!(config.policy, RecommendPolicy::TwoTier);
        assert_eq!(config.max_conflict_retries, 3);
        assert!(matches!(config.phonemizer, PhonemizerConfig::Literal));
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
curriculum_dir = "./lessons"
store_path = "./progress.json"
mastery_threshold = 90.0
policy = "weighted_priority"

[phonemizer]
type = "cmudict"
path = "cmudict.dict"
"#;
        let config: PhonodrillConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mastery_threshold, 90.0);
        assert_eq!(config.policy, RecommendPolicy::WeightedPriority);
        assert!(matches!(
            config.phonemizer,
            PhonemizerConfig::Cmudict { .. }
        ));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "mastery_threshold = 75.0").unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.mastery_threshold, 75.0);
        // Unspecified fields keep their defaults.
        assert_eq!(config.policy, RecommendPolicy::TwoTier);
    }

    #[test]
    fn missing_explicit_path_fails() {
        assert!(load_config_from(Some(Path::new("no/such/config.toml"))).is_err());
    }

    #[test]
    fn create_literal_phonemizer() {
        let phonemizer = create_phonemizer(&PhonemizerConfig::Literal).unwrap();
        assert_eq!(phonemizer.name(), "literal");
    }
}
