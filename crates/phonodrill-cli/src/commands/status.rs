//! The `phonodrill status` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use phonodrill_core::summary::WordStatus;

pub async fn execute(
    level: String,
    user: Option<String>,
    json: bool,
    config: Option<PathBuf>,
    curriculum: Option<PathBuf>,
) -> Result<()> {
    let user_id = super::parse_user(user.as_deref())?;
    let engine = super::build_engine(config, curriculum, None).await?;

    let status = engine.level_status(user_id, &level).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!(
        "Level '{}': {}/{} mastered ({:.2}% complete), {} in progress, {} not started",
        status.level,
        status.mastered,
        status.total_words,
        status.completion_percent,
        status.in_progress,
        status.not_started,
    );

    let mut table = Table::new();
    table.set_header(vec!["Word", "Status", "Score", "Attempts"]);
    for row in &status.words {
        let label = match row.status {
            WordStatus::Mastered => "mastered",
            WordStatus::InProgress => "in progress",
            WordStatus::NotStarted => "not started",
        };
        table.add_row(vec![
            Cell::new(&row.word),
            Cell::new(label),
            Cell::new(
                row.score
                    .map(|s| format!("{s:.2}"))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Cell::new(row.attempts),
        ]);
    }
    println!("{table}");

    Ok(())
}
