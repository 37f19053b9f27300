//! Subcommand implementations.

pub mod init;
pub mod next;
pub mod progress;
pub mod score;
pub mod status;
pub mod validate;

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use phonodrill_adapters::{create_phonemizer, load_config_from};
use phonodrill_core::curriculum::{self, Curriculum};
use phonodrill_core::engine::{PracticeEngine, PracticeEngineConfig};
use phonodrill_core::recommend::RecommendPolicy;
use phonodrill_store::JsonStore;

/// Parse the `--user` argument, defaulting to the local single user.
pub(crate) fn parse_user(user: Option<&str>) -> Result<Uuid> {
    match user {
        Some(raw) => Uuid::parse_str(raw).with_context(|| format!("invalid user id: {raw}")),
        None => Ok(Uuid::nil()),
    }
}

/// Load a curriculum from an explicit file or directory path.
fn load_curriculum(path: &Path) -> Result<Curriculum> {
    if path.is_dir() {
        let mut curricula = curriculum::load_curriculum_directory(path)?;
        if curricula.is_empty() {
            anyhow::bail!("no curriculum files found in {}", path.display());
        }
        if curricula.len() > 1 {
            tracing::debug!("multiple curricula found, using '{}'", curricula[0].id);
        }
        Ok(curricula.remove(0))
    } else {
        curriculum::parse_curriculum(path)
    }
}

/// Build the practice engine from config and CLI overrides.
pub(crate) async fn build_engine(
    config_path: Option<PathBuf>,
    curriculum_path: Option<PathBuf>,
    policy_override: Option<String>,
) -> Result<PracticeEngine> {
    let config = load_config_from(config_path.as_deref())?;

    let curriculum_source = curriculum_path.unwrap_or_else(|| config.curriculum_dir.clone());
    if !curriculum_source.exists() {
        anyhow::bail!(
            "curriculum not found at {} (run `phonodrill init` to create a starter)",
            curriculum_source.display()
        );
    }
    let curriculum = load_curriculum(&curriculum_source)?;

    let policy = match policy_override {
        Some(raw) => RecommendPolicy::from_str(&raw).map_err(|e| anyhow::anyhow!(e))?,
        None => config.policy,
    };

    let phonemizer = create_phonemizer(&config.phonemizer)?;
    let store = Arc::new(JsonStore::open(&config.store_path)?);

    Ok(PracticeEngine::new(
        phonemizer,
        store,
        curriculum,
        PracticeEngineConfig {
            mastery_threshold: config.mastery_threshold,
            policy,
            max_conflict_retries: config.max_conflict_retries,
        },
    ))
}
