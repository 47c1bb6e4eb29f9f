//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const QUIZ: &str = "../../quizzes/networking.json";

fn quizplay() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizplay").unwrap()
}

fn write_mock_config(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("quizplay.toml");
    std::fs::write(
        &path,
        "default_provider = \"offline\"\n\n[providers.offline]\ntype = \"mock\"\n",
    )
    .unwrap();
    path
}

#[test]
fn validate_fenced_quiz() {
    quizplay()
        .arg("validate")
        .arg("--quiz")
        .arg(QUIZ)
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("Quiz is valid."));
}

#[test]
fn validate_unsupported_type() {
    quizplay()
        .arg("validate")
        .arg("--quiz")
        .arg("../../quizzes/broken.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported question type: essay"))
        .stderr(predicate::str::contains("cannot grade"));
}

#[test]
fn validate_nonexistent_file() {
    quizplay()
        .arg("validate")
        .arg("--quiz")
        .arg("nonexistent.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("Hint").not());
}

#[test]
fn grade_text_output() {
    quizplay()
        .arg("grade")
        .arg("--quiz")
        .arg(QUIZ)
        .arg("--answers")
        .arg("../../quizzes/networking-answers.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Score: 80% (4 out of 5 correct)"))
        .stdout(predicate::str::contains("HTTPS runs HTTP over TLS on port 443."))
        .stdout(predicate::str::contains("RFC 2818 (rfc-editor.org)"));
}

#[test]
fn grade_json_output() {
    let output = quizplay()
        .arg("grade")
        .arg("--quiz")
        .arg(QUIZ)
        .arg("--answers")
        .arg("../../quizzes/networking-answers.json")
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["score"], 80);
    assert_eq!(result["total"], 5);
    let details = result["details"].as_array().unwrap();
    assert_eq!(details[1]["user_answer"], "true");
    assert_eq!(details[3]["is_correct"], false);
}

#[test]
fn grade_incomplete_submission_fails() {
    quizplay()
        .arg("grade")
        .arg("--quiz")
        .arg(QUIZ)
        .arg("--answers")
        .arg("../../quizzes/networking-partial.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no answer for question(s) [3, 4]"))
        .stderr(predicate::str::contains("Hint: answer every question"));
}

#[test]
fn grade_unknown_format() {
    quizplay()
        .arg("grade")
        .arg("--quiz")
        .arg(QUIZ)
        .arg("--answers")
        .arg("../../quizzes/networking-answers.json")
        .arg("--format")
        .arg("xml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

#[test]
fn generate_with_mock_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_mock_config(&dir);
    let output = dir.path().join("out/quiz.json");

    quizplay()
        .arg("generate")
        .arg("--topic")
        .arg("networking")
        .arg("--config")
        .arg(&config)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("5 questions saved"));

    quizplay()
        .arg("validate")
        .arg("--quiz")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Quiz is valid."));
}

#[test]
fn generate_malformed_payload_suggests_retry() {
    let dir = TempDir::new().unwrap();
    let payload = dir.path().join("payload.txt");
    std::fs::write(&payload, "Sorry, I cannot help with that.").unwrap();
    let config = dir.path().join("quizplay.toml");
    std::fs::write(
        &config,
        format!(
            "default_provider = \"offline\"\n\n[providers.offline]\ntype = \"mock\"\npayload_file = {:?}\n",
            payload.display().to_string()
        ),
    )
    .unwrap();

    quizplay()
        .arg("generate")
        .arg("--topic")
        .arg("networking")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed quiz payload"))
        .stderr(predicate::str::contains("Hint: generate the quiz again"));
}

#[test]
fn generate_unknown_provider() {
    let dir = TempDir::new().unwrap();
    let config = write_mock_config(&dir);

    quizplay()
        .arg("generate")
        .arg("--topic")
        .arg("networking")
        .arg("--provider")
        .arg("nope")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("provider 'nope' not found"));
}

#[test]
fn list_models_for_mock() {
    let dir = TempDir::new().unwrap();
    let config = write_mock_config(&dir);

    quizplay()
        .arg("list-models")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("mock-model"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizplay()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizplay.toml"))
        .stdout(predicate::str::contains("Created quizzes/sample.json"));

    assert!(dir.path().join("quizplay.toml").exists());

    quizplay()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--quiz")
        .arg("quizzes/sample.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("4 questions"))
        .stdout(predicate::str::contains("Quiz is valid."));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizplay()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizplay()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    quizplay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generate, validate and grade quizzes"));
}

#[test]
fn version_output() {
    quizplay()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizplay"));
}
