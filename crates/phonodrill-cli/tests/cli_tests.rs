//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn phonodrill() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("phonodrill").unwrap()
}

/// A workspace with starter config and curriculum, as `init` creates.
fn initialized_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    phonodrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    phonodrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created phonodrill.toml"))
        .stdout(predicate::str::contains("Created curricula/starter.toml"));

    assert!(dir.path().join("phonodrill.toml").exists());
    assert!(dir.path().join("curricula/starter.toml").exists());
}

#[test]
fn init_skips_existing() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn validate_starter_curriculum() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--curriculum")
        .arg("curricula/starter.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter English"))
        .stdout(predicate::str::contains("All curricula valid"));
}

#[test]
fn validate_directory() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--curriculum")
        .arg("curricula")
        .assert()
        .success()
        .stdout(predicate::str::contains("Starter English"));
}

#[test]
fn validate_nonexistent_file() {
    phonodrill()
        .arg("validate")
        .arg("--curriculum")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bad.toml"),
        r#"
[curriculum]
id = "bad"
name = "Bad"

[[levels]]
name = "one"
words = ["cat", "cat"]
"#,
    )
    .unwrap();

    phonodrill()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--curriculum")
        .arg("bad.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("duplicate word"))
        .stdout(predicate::str::contains("warning(s) found"));
}

#[test]
fn score_perfect_attempt() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--phonemes")
        .arg("K AE1 T")
        .assert()
        .success()
        .stdout(predicate::str::contains("Overall score: 100.00"))
        .stdout(predicate::str::contains("mastered"));
}

#[test]
fn score_partial_attempt_shows_mistakes() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--phonemes")
        .arg("K EH T")
        .assert()
        .success()
        .stdout(predicate::str::contains("66.67"));
}

#[test]
fn score_unknown_word_fails() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("zebra")
        .arg("--phonemes")
        .arg("Z")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown word"));
}

#[test]
fn score_requires_input() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--phonemes or --spoken"));
}

#[test]
fn score_word_mode() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--spoken")
        .arg("cat")
        .assert()
        .success()
        .stdout(predicate::str::contains("Average word score: 100.00"));
}

#[test]
fn score_writes_json_report() {
    let dir = initialized_dir();
    let report_path = dir.path().join("report.json");

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--phonemes")
        .arg("K AE T")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written"));

    let content = std::fs::read_to_string(&report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["result"]["overall_score"], 100.0);
}

#[test]
fn next_recommends_first_word() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("'cat'"))
        .stdout(predicate::str::contains("new_word"));
}

#[test]
fn next_moves_on_after_mastery() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--phonemes")
        .arg("K AE T")
        .assert()
        .success();

    phonodrill()
        .current_dir(dir.path())
        .arg("next")
        .assert()
        .success()
        .stdout(predicate::str::contains("'dog'"));
}

#[test]
fn next_json_output() {
    let dir = initialized_dir();

    let output = phonodrill()
        .current_dir(dir.path())
        .arg("next")
        .arg("--json")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["status"], "practice");
    assert_eq!(value["word"], "cat");
}

#[test]
fn next_with_weighted_policy() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("next")
        .arg("--policy")
        .arg("weighted_priority")
        .assert()
        .success()
        .stdout(predicate::str::contains("Next up"));
}

#[test]
fn status_lists_level_words() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("status")
        .arg("--level")
        .arg("beginner")
        .assert()
        .success()
        .stdout(predicate::str::contains("0/3 mastered"))
        .stdout(predicate::str::contains("not started"));
}

#[test]
fn status_unknown_level_fails() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("status")
        .arg("--level")
        .arg("expert")
        .assert()
        .failure()
        .stderr(predicate::str::contains("level not found"));
}

#[test]
fn progress_empty_then_populated() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("No attempts recorded"));

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("dog")
        .arg("--phonemes")
        .arg("D AO G")
        .assert()
        .success();

    phonodrill()
        .current_dir(dir.path())
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("dog"))
        .stdout(predicate::str::contains("100.00"));
}

#[test]
fn progress_reset_clears_a_word() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("score")
        .arg("--word")
        .arg("cat")
        .arg("--phonemes")
        .arg("K AE T")
        .assert()
        .success();

    phonodrill()
        .current_dir(dir.path())
        .arg("progress")
        .arg("--reset")
        .arg("cat")
        .assert()
        .success()
        .stdout(predicate::str::contains("has been reset"));

    phonodrill()
        .current_dir(dir.path())
        .arg("progress")
        .arg("--reset")
        .arg("dog")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to reset"));
}

#[test]
fn invalid_user_id_fails() {
    let dir = initialized_dir();

    phonodrill()
        .current_dir(dir.path())
        .arg("progress")
        .arg("--user")
        .arg("not-a-uuid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid user id"));
}

#[test]
fn help_output() {
    phonodrill()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Pronunciation practice scoring engine",
        ));
}

#[test]
fn version_output() {
    phonodrill()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("phonodrill"));
}
