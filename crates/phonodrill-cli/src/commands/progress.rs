//! The `phonodrill progress` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

pub async fn execute(
    user: Option<String>,
    reset: Option<String>,
    json: bool,
    config: Option<PathBuf>,
    curriculum: Option<PathBuf>,
) -> Result<()> {
    let user_id = super::parse_user(user.as_deref())?;
    let engine = super::build_engine(config, curriculum, None).await?;

    if let Some(word) = reset {
        return match engine.reset_progress(user_id, &word).await? {
            Some(record) => {
                println!("Progress for '{}' has been reset.", record.word_id);
                Ok(())
            }
            None => {
                println!("No progress recorded for '{word}', nothing to reset.");
                Ok(())
            }
        };
    }

    let rows = engine.progress_summary(user_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No attempts recorded yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Word", "Score", "Attempts", "Mastered", "Moving Avg", "Streak", "Penalty",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.word),
            Cell::new(format!("{:.2}", row.score)),
            Cell::new(row.attempts),
            Cell::new(if row.mastered { "yes" } else { "no" }),
            Cell::new(format!("{:.2}", row.moving_avg_score)),
            Cell::new(row.streak_score),
            Cell::new(format!("{:.1}", row.penalty_score)),
        ]);
    }
    println!("{table}");

    Ok(())
}
