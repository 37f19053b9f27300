//! The `phonodrill next` command.

use std::path::PathBuf;

use anyhow::Result;

use phonodrill_core::recommend::Recommendation;

pub async fn execute(
    user: Option<String>,
    level: Option<String>,
    policy: Option<String>,
    json: bool,
    config: Option<PathBuf>,
    curriculum: Option<PathBuf>,
) -> Result<()> {
    let user_id = super::parse_user(user.as_deref())?;
    let engine = super::build_engine(config, curriculum, policy).await?;

    let recommendation = match level {
        Some(name) => engine.adaptive_next(user_id, &name).await?,
        None => engine.next_word(user_id).await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendation)?);
        return Ok(());
    }

    match recommendation {
        Recommendation::Practice {
            level,
            word,
            reason,
            score,
            priority,
        } => {
            println!("Next up: '{word}' in level '{level}' ({reason})");
            if let Some(score) = score {
                println!("Current score: {score:.2}");
            }
            if let Some(priority) = priority {
                println!("Priority: {priority:.2}");
            }
        }
        Recommendation::LevelComplete {
            level,
            mastered,
            total,
        } => {
            println!("Level '{level}' is complete ({mastered}/{total} words mastered).");
        }
        Recommendation::AllMastered => {
            println!("Everything is mastered. Nothing left to practice!");
        }
        Recommendation::Unavailable { reason } => {
            println!("No recommendation available: {reason}");
        }
    }

    Ok(())
}
