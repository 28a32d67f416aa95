//! The `quizline validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizline_core::config::load_config_from;
use quizline_core::parser::parse_question_bank;

pub fn execute(bank: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let path = bank.unwrap_or(config.question_bank);

    let bank = parse_question_bank(&path)?;
    println!(
        "Question bank: {} ({} questions)",
        path.display(),
        bank.questions.len()
    );

    for (subject, count) in bank.subject_counts() {
        println!("  {subject}: {count}");
    }
    for subject in &config.subjects {
        if bank.for_subject(subject).is_empty() {
            println!("  {subject}: 0 (no questions)");
        }
    }

    for d in &bank.diagnostics {
        let label = if d.skipped { "SKIPPED" } else { "WARNING" };
        println!("  [#{}] {label}: {}", d.position + 1, d.message);
    }

    let skipped = bank.skipped();
    if bank.diagnostics.is_empty() {
        println!("All questions valid.");
    } else {
        println!(
            "\n{} issue(s) found, {skipped} question(s) skipped.",
            bank.diagnostics.len()
        );
    }

    Ok(())
}
