//! The `phonodrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create phonodrill.toml
    if std::path::Path::new("phonodrill.toml").exists() {
        println!("phonodrill.toml already exists, skipping.");
    } else {
        std::fs::write("phonodrill.toml", SAMPLE_CONFIG)?;
        println!("Created phonodrill.toml");
    }

    // Create example curriculum
    std::fs::create_dir_all("curricula")?;
    let example_path = std::path::Path::new("curricula/starter.toml");
    if example_path.exists() {
        println!("curricula/starter.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, STARTER_CURRICULUM)?;
        println!("Created curricula/starter.toml");
    }

    println!("\nNext steps:");
    println!("  1. Point phonodrill.toml at a pronunciation dictionary (optional)");
    println!("  2. Run: phonodrill validate --curriculum curricula/starter.toml");
    println!("  3. Run: phonodrill score --word cat --phonemes \"K AE T\"");
    println!("  4. Run: phonodrill next");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# phonodrill configuration

curriculum_dir = "./curricula"
store_path = "./phonodrill-progress.json"
mastery_threshold = 80.0
policy = "two_tier"

# Point at a CMU-style dictionary to resolve phonemes for words the
# curriculum does not spell out:
# [phonemizer]
# type = "cmudict"
# path = "./cmudict.dict"

[phonemizer]
type = "literal"
"#;

const STARTER_CURRICULUM: &str = r#"[curriculum]
id = "starter"
name = "Starter English"
description = "A small set of first words to practice"

[[levels]]
name = "beginner"
words = [
    { text = "cat", phonemes = ["K", "AE1", "T"] },
    { text = "dog", phonemes = ["D", "AO1", "G"] },
    { text = "sun", phonemes = ["S", "AH1", "N"] },
]

[[levels]]
name = "intermediate"
words = [
    { text = "water", phonemes = ["W", "AO1", "T", "ER0"] },
    { text = "banana", phonemes = ["B", "AH0", "N", "AE1", "N", "AH0"], difficulty = 2 },
]
"#;
