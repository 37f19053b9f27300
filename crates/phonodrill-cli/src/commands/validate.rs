//! The `phonodrill validate` command.

use std::path::PathBuf;

use anyhow::Result;

use phonodrill_core::curriculum;

pub fn execute(curriculum_path: PathBuf) -> Result<()> {
    let curricula = if curriculum_path.is_dir() {
        curriculum::load_curriculum_directory(&curriculum_path)?
    } else {
        vec![curriculum::parse_curriculum(&curriculum_path)?]
    };

    if curricula.is_empty() {
        anyhow::bail!("no curriculum files found in {}", curriculum_path.display());
    }

    let mut total_warnings = 0;

    for c in &curricula {
        println!(
            "Curriculum: {} ({} levels, {} words)",
            c.name,
            c.levels.len(),
            c.word_count()
        );

        let warnings = curriculum::validate_curriculum(c);
        for w in &warnings {
            let prefix = w
                .level
                .as_ref()
                .map(|name| format!("  [{name}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All curricula valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
