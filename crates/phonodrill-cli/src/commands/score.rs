//! The `phonodrill score` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use phonodrill_core::align::EditKind;
use phonodrill_core::engine::{AttemptOutcome, WordAttemptOutcome};
use phonodrill_core::scorer::WordBreakdown;
use phonodrill_core::token::Token;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    word: String,
    phonemes: Option<String>,
    spoken: Option<String>,
    user: Option<String>,
    time: f64,
    report: Option<PathBuf>,
    json: bool,
    config: Option<PathBuf>,
    curriculum: Option<PathBuf>,
) -> Result<()> {
    let user_id = super::parse_user(user.as_deref())?;
    let engine = super::build_engine(config, curriculum, None).await?;

    match (phonemes, spoken) {
        (Some(raw), _) => {
            let observed: Vec<Token> = raw.split_whitespace().map(Token::new).collect();
            let outcome = engine.score_attempt(user_id, &word, &observed, time).await?;

            if let Some(path) = &report {
                let full = engine.attempt_report(user_id, &word, &observed, &outcome);
                full.save_json(path)?;
                println!("Report written to {}", path.display());
            }

            if json {
                print_phoneme_json(&word, &outcome)?;
            } else {
                print_phoneme_table(&word, &outcome);
            }
        }
        (None, Some(text)) => {
            let outcome = engine
                .score_word_attempt(user_id, &word, &text, time)
                .await?;

            if json {
                print_word_json(&word, &outcome)?;
            } else {
                print_word_table(&word, &outcome);
            }
        }
        (None, None) => {
            anyhow::bail!("provide either --phonemes or --spoken");
        }
    }

    Ok(())
}

fn describe_mistakes(breakdown: &WordBreakdown) -> String {
    let parts: Vec<String> = breakdown
        .mistakes
        .iter()
        .map(|m| match (&m.kind, &m.observed) {
            (EditKind::Deletion, _) => format!("{} skipped", m.expected),
            (_, Some(observed)) => format!("{} \u{2192} {observed}", m.expected),
            (_, None) => format!("{} ?", m.expected),
        })
        .collect();
    parts.join(", ")
}

fn print_phoneme_table(word: &str, outcome: &AttemptOutcome) {
    println!("Attempt: {word}");
    println!("Overall score: {:.2}", outcome.result.overall_score);

    let mut table = Table::new();
    table.set_header(vec!["Word", "Score", "Matched", "Mistakes"]);
    for breakdown in &outcome.result.per_word {
        table.add_row(vec![
            Cell::new(&breakdown.word),
            Cell::new(format!("{:.2}", breakdown.score)),
            Cell::new(format!(
                "{}/{}",
                breakdown.matched_count, breakdown.phoneme_count
            )),
            Cell::new(describe_mistakes(breakdown)),
        ]);
    }
    println!("{table}");

    if !outcome.result.insertions.is_empty() {
        let extra: Vec<String> = outcome
            .result
            .insertions
            .iter()
            .map(|t| t.to_string())
            .collect();
        println!("Extra phonemes: {}", extra.join(" "));
    }

    print_progress_line(outcome);
}

fn print_progress_line(outcome: &AttemptOutcome) {
    let progress = &outcome.progress;
    println!(
        "Progress: attempts {}, moving avg {:.2}, streak {}, {}",
        progress.attempts,
        progress.moving_avg_score,
        progress.streak_score,
        if progress.mastered {
            "mastered"
        } else {
            "not yet mastered"
        }
    );
}

fn print_phoneme_json(word: &str, outcome: &AttemptOutcome) -> Result<()> {
    let value = serde_json::json!({
        "word": word,
        "overall_score": outcome.result.overall_score,
        "per_word": outcome.result.per_word,
        "insertions": outcome.result.insertions,
        "progress": outcome.progress,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_word_table(word: &str, outcome: &WordAttemptOutcome) {
    println!("Attempt: {word}");
    println!(
        "Average word score: {:.2} (text similarity {:.2})",
        outcome.analysis.avg_word_score, outcome.similarity
    );

    let mut table = Table::new();
    table.set_header(vec!["Expected", "Heard", "Score", "Mistake"]);
    for comparison in &outcome.analysis.breakdown {
        table.add_row(vec![
            Cell::new(&comparison.expected),
            Cell::new(&comparison.spoken),
            Cell::new(format!("{:.2}", comparison.score)),
            Cell::new(
                comparison
                    .mistake
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
            ),
        ]);
    }
    println!("{table}");

    let progress = &outcome.progress;
    println!(
        "Progress: attempts {}, moving avg {:.2}, streak {}, {}",
        progress.attempts,
        progress.moving_avg_score,
        progress.streak_score,
        if progress.mastered {
            "mastered"
        } else {
            "not yet mastered"
        }
    );
}

fn print_word_json(word: &str, outcome: &WordAttemptOutcome) -> Result<()> {
    let value = serde_json::json!({
        "word": word,
        "avg_word_score": outcome.analysis.avg_word_score,
        "similarity": outcome.similarity,
        "breakdown": outcome.analysis.breakdown,
        "progress": outcome.progress,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
