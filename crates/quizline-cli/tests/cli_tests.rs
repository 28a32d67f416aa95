//! CLI integration tests using assert_cmd.

use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ONE_PHYSICS_QUESTION: &str = r#"[
  {
    "subject": "Physics",
    "question": "What is the SI unit of force?",
    "options": ["Joule", "Newton", "Watt", "Pascal"],
    "answer": "Newton",
    "explanation": "Force is measured in newtons."
  },
  {
    "subject": "Chemistry",
    "question": "Symbol for sodium?",
    "options": ["S", "So", "Na", "Sd"],
    "answer": "Na"
  }
]"#;

/// A command isolated to `dir`: working directory, home and data directory.
fn quizline(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizline").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("QUIZLINE_DATA_DIR", dir.join("data"))
        .env_remove("RUST_LOG");
    cmd
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("bank.json"), ONE_PHYSICS_QUESTION).unwrap();
    quizline(dir.path())
        .args(["user", "register", "--username", "ana", "--password", "pw"])
        .assert()
        .success();
    dir
}

fn take(dir: &Path) -> Command {
    let mut cmd = quizline(dir);
    cmd.args([
        "take",
        "--username",
        "ana",
        "--password",
        "pw",
        "--roll",
        "42",
        "--name",
        "Ana",
        "--class",
        "7A",
        "--bank",
        "bank.json",
    ]);
    cmd
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    quizline(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizline.toml"))
        .stdout(predicate::str::contains("Created questions.json"));

    assert!(dir.path().join("quizline.toml").exists());
    assert!(dir.path().join("questions.json").exists());

    quizline(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}

#[test]
fn validate_starter_bank() {
    let dir = TempDir::new().unwrap();
    quizline(dir.path()).arg("init").assert().success();

    quizline(dir.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 questions"))
        .stdout(predicate::str::contains("Physics: 2"))
        .stdout(predicate::str::contains("All questions valid"));
}

#[test]
fn validate_reports_skipped_entries() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("bank.json"),
        r#"[
  {"subject": "Physics", "question": "Ok?", "options": ["a", "b", "c", "d"], "answer": "b"},
  {"subject": "Physics", "question": "Three options", "options": ["a", "b", "c"], "answer": "a"},
  {"subject": "Physics", "question": "No match", "options": ["a", "b", "c", "d"], "answer": "z"}
]"#,
    )
    .unwrap();

    quizline(dir.path())
        .args(["validate", "--bank", "bank.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 questions"))
        .stdout(predicate::str::contains("SKIPPED"))
        .stdout(predicate::str::contains("WARNING"))
        .stdout(predicate::str::contains("1 question(s) skipped"));
}

#[test]
fn validate_nonexistent_bank() {
    let dir = TempDir::new().unwrap();
    quizline(dir.path())
        .args(["validate", "--bank", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn missing_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    quizline(dir.path())
        .args(["--config", "nope.toml", "scores", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn user_register_and_login() {
    let dir = setup();

    quizline(dir.path())
        .args(["user", "register", "--username", "ana", "--password", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    quizline(dir.path())
        .args(["user", "login", "--username", "ana", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login successful"));

    quizline(dir.path())
        .args(["user", "login", "--username", "ana", "--password", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid username or password"));
}

#[test]
fn scores_add_list_delete_clear() {
    let dir = TempDir::new().unwrap();
    let add = |roll: &str, name: &str| {
        quizline(dir.path())
            .args([
                "scores", "add", "--roll", roll, "--name", name, "--class", "7A", "--subject",
                "Physics", "--score", "3", "--total", "5",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("Recorded 3/5"));
    };
    add("1", "Ana, Jr.");
    add("2", "Ben");

    quizline(dir.path())
        .args(["scores", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana, Jr."))
        .stdout(predicate::str::contains("2 row(s)"));

    quizline(dir.path())
        .args(["scores", "list", "--roll", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ben"))
        .stdout(predicate::str::contains("Ana").not());

    quizline(dir.path())
        .args(["scores", "delete", "--roll", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1 row(s)"));

    let csv = std::fs::read_to_string(dir.path().join("data/scores.csv")).unwrap();
    assert!(csv.starts_with("Roll,Name,Class,Subject,Score,Total,Timestamp"));
    assert!(!csv.contains("Ana"));

    quizline(dir.path())
        .args(["scores", "clear"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    quizline(dir.path())
        .args(["scores", "clear", "--yes"])
        .assert()
        .success();
    assert!(!dir.path().join("data/scores.csv").exists());

    quizline(dir.path())
        .args(["scores", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No scores recorded"));
}

#[test]
fn scores_add_rejects_non_integer() {
    let dir = TempDir::new().unwrap();
    quizline(dir.path())
        .args([
            "scores", "add", "--roll", "1", "--name", "Ana", "--class", "7A", "--subject",
            "Physics", "--score", "ten", "--total", "5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not an integer"));
    assert!(!dir.path().join("data/scores.csv").exists());
}

#[test]
fn take_completes_and_records_score() {
    let dir = setup();

    take(dir.path())
        .args(["--subject", "Physics", "--export", "out/review"])
        .write_stdin("1\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Question 1/1"))
        .stdout(predicate::str::contains("What is the SI unit of force?"))
        .stdout(predicate::str::contains("Session complete: "))
        .stdout(predicate::str::contains("Correct   |"));

    assert!(dir.path().join("out/review.pdf").exists());
    assert!(dir.path().join("out/review.png").exists());
    assert!(dir.path().join("data/qversions").exists());

    let output = quizline(dir.path())
        .args(["scores", "list", "--json"])
        .output()
        .unwrap();
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["roll"], "42");
    assert_eq!(rows[0]["subject"], "Physics");
    assert_eq!(rows[0]["total"], "1");
}

#[test]
fn take_prompts_for_subject() {
    let dir = setup();

    take(dir.path())
        .args(["--explanations", "expl"])
        .write_stdin("2\nn\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Choose a subject"))
        .stdout(predicate::str::contains("Symbol for sodium?"))
        .stdout(predicate::str::contains("Explanations exported to"));

    assert!(dir.path().join("expl.pdf").exists());
}

#[test]
fn quitting_records_nothing() {
    let dir = setup();

    take(dir.path())
        .args(["--subject", "Physics"])
        .write_stdin("1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session abandoned"));

    assert!(!dir.path().join("data/scores.csv").exists());
    assert!(!dir.path().join("data/qversions").exists());
}

#[test]
fn back_at_first_question_is_reported() {
    let dir = setup();

    take(dir.path())
        .args(["--subject", "Physics"])
        .write_stdin("b\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already at the first question"));
}

#[test]
fn take_requires_valid_login() {
    let dir = setup();

    quizline(dir.path())
        .args([
            "take", "--username", "ana", "--password", "nope", "--roll", "42", "--name", "Ana",
            "--class", "7A", "--subject", "Physics", "--bank", "bank.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid username or password"));
}

#[test]
fn take_without_matching_questions_fails_cleanly() {
    let dir = setup();

    take(dir.path())
        .args(["--subject", "Biology"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no questions available"));

    assert!(!dir.path().join("data/scores.csv").exists());
}

#[test]
fn failed_score_write_is_reported_once_and_not_retried_by_the_timer() {
    let dir = setup();
    // A directory where the score file should be makes every append fail.
    std::fs::create_dir_all(dir.path().join("data/scores.csv")).unwrap();

    #[allow(deprecated)]
    let bin = assert_cmd::cargo::cargo_bin("quizline");
    let mut child = std::process::Command::new(bin)
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("QUIZLINE_DATA_DIR", dir.path().join("data"))
        .env_remove("RUST_LOG")
        .args([
            "take", "--username", "ana", "--password", "pw", "--roll", "42", "--name", "Ana",
            "--class", "7A", "--bank", "bank.json", "--subject", "Physics", "--seconds", "1",
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"n\n").unwrap();
    std::thread::sleep(Duration::from_millis(2500));
    stdin.write_all(b"q\n").unwrap();
    drop(stdin);

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Could not record the score").count(), 1);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Session abandoned"));
}
