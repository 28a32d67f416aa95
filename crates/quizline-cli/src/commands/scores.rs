//! The `quizline scores` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizline_core::config::load_config_from;
use quizline_core::ledger::{ScoreInput, ScoreLedger, ScoreRow};

fn ledger(config_path: Option<PathBuf>) -> Result<ScoreLedger> {
    let config = load_config_from(config_path.as_deref())?;
    Ok(ScoreLedger::new(config.scores_path()))
}

pub fn list(roll: Option<String>, json: bool, config_path: Option<PathBuf>) -> Result<()> {
    let ledger = ledger(config_path)?;
    let rows: Vec<ScoreRow> = ledger
        .query()?
        .into_iter()
        .filter(|row| roll.as_deref().map_or(true, |r| row.roll == r.trim()))
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("failed to encode scores")?
        );
        return Ok(());
    }

    if rows.is_empty() {
        println!("No scores recorded.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Roll",
        "Name",
        "Class",
        "Subject",
        "Score",
        "Total",
        "Timestamp",
    ]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(&row.roll),
            Cell::new(&row.name),
            Cell::new(&row.class),
            Cell::new(&row.subject),
            Cell::new(&row.score),
            Cell::new(&row.total),
            Cell::new(&row.timestamp),
        ]);
    }
    println!("{table}");
    println!("{} row(s)", rows.len());
    Ok(())
}

pub fn add(input: ScoreInput, config_path: Option<PathBuf>) -> Result<()> {
    let ledger = ledger(config_path)?;
    let record = ledger.add_input(input)?;
    println!(
        "Recorded {}/{} for roll {} ({})",
        record.score, record.total, record.roll, record.subject
    );
    Ok(())
}

pub fn delete(roll: String, config_path: Option<PathBuf>) -> Result<()> {
    let roll = roll.trim();
    anyhow::ensure!(!roll.is_empty(), "roll must not be empty");
    let ledger = ledger(config_path)?;
    let removed = ledger.delete_by_key(roll)?;
    if removed == 0 {
        println!("No scores found for roll {roll}.");
    } else {
        println!("Deleted {removed} row(s) for roll {roll}.");
    }
    Ok(())
}

pub fn clear(yes: bool, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(yes, "refusing to delete all scores without --yes");
    let ledger = ledger(config_path)?;
    ledger.delete_all()?;
    println!("All scores deleted.");
    Ok(())
}
