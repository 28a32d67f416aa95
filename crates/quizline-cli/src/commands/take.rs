//! The `quizline take` command.
//!
//! Reads one command per line from stdin while a per-question countdown
//! runs. Ending input before the last question abandons the session.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use quizline_core::auth::UserStore;
use quizline_core::config::{load_config_from, QuizlineConfig};
use quizline_core::countdown::QuestionTimer;
use quizline_core::engine::{AdvanceOutcome, SessionConfig, SessionEngine, TickOutcome};
use quizline_core::error::{ErrorKind, SessionError};
use quizline_core::ledger::ScoreLedger;
use quizline_core::model::{Candidate, OPTION_COUNT};
use quizline_core::parser::load_questions;
use quizline_core::review::review_rows;
use quizline_core::session::{Presentation, SessionState, SessionSummary};
use quizline_core::versions::VersionLedger;
use quizline_report::{export_explanations, export_review, LayoutOptions};

const CHART_WIDTH: usize = 30;
const TIME_WARNING_SECS: u32 = 10;

#[derive(Args)]
pub struct TakeArgs {
    /// Registered username
    #[arg(long)]
    username: String,

    /// Password for the user
    #[arg(long)]
    password: String,

    /// Candidate roll number
    #[arg(long)]
    roll: String,

    /// Candidate name
    #[arg(long)]
    name: String,

    /// Candidate class
    #[arg(long)]
    class: String,

    /// Subject (asked on stdin if omitted)
    #[arg(long)]
    subject: Option<String>,

    /// Question bank JSON (defaults to the configured bank)
    #[arg(long)]
    bank: Option<PathBuf>,

    /// Seconds per question
    #[arg(long)]
    seconds: Option<u32>,

    /// Export the review to this path (.pdf plus a .png fallback)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export explanations to this path (.pdf)
    #[arg(long)]
    explanations: Option<PathBuf>,

    /// Seed for question and option order
    #[arg(long)]
    seed: Option<u64>,
}

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Choose(usize),
    Next,
    Back,
    Quit,
    Show,
    Help,
    Empty,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    if let Ok(n) = line.parse::<usize>() {
        return match n {
            1..=OPTION_COUNT => Command::Choose(n - 1),
            _ => Command::Unknown(line.to_string()),
        };
    }
    match line.to_lowercase().as_str() {
        "n" | "next" => Command::Next,
        "b" | "back" => Command::Back,
        "q" | "quit" => Command::Quit,
        "s" | "show" => Command::Show,
        "?" | "h" | "help" => Command::Help,
        _ => Command::Unknown(line.to_string()),
    }
}

enum Ending {
    Finished(SessionSummary),
    Abandoned,
}

pub async fn execute(args: TakeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let users = UserStore::new(config.users_path());
    anyhow::ensure!(
        users.authenticate(&args.username, &args.password)?,
        "invalid username or password"
    );

    let bank_path = args.bank.clone().unwrap_or_else(|| config.question_bank.clone());
    let bank = load_questions(&bank_path);
    if bank.questions.is_empty() {
        eprintln!("No questions loaded from {}", bank_path.display());
    }

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let subject = match args.subject.clone() {
        Some(subject) => subject,
        None => choose_subject(&config.subjects, &mut input).await?,
    };

    let seconds = args.seconds.unwrap_or(config.seconds_per_question);
    anyhow::ensure!(seconds >= 1, "seconds per question must be at least 1");

    let mut engine = SessionEngine::new(
        SessionConfig {
            seconds_per_question: seconds,
        },
        ScoreLedger::new(config.scores_path()),
        VersionLedger::new(config.versions_path()),
    );
    if let Some(seed) = args.seed {
        engine = engine.with_seed(seed);
    }

    let candidate = Candidate::new(args.roll.clone(), args.name.clone(), args.class.clone());
    let mut state = engine.start(&bank.questions, &subject, candidate)?;
    println!(
        "Starting {} ({} questions, {seconds}s each). Type ? for help.",
        state.subject(),
        state.len()
    );

    match run_session(&mut engine, &mut state, &mut input).await? {
        Ending::Finished(summary) => finish(&state, &summary, &args, &config),
        Ending::Abandoned => {
            tracing::info!(session = %state.id(), "session abandoned");
            println!("Session abandoned; nothing was recorded.");
            Ok(())
        }
    }
}

async fn choose_subject(subjects: &[String], input: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    println!("Choose a subject:");
    for (i, subject) in subjects.iter().enumerate() {
        println!("  {}) {subject}", i + 1);
    }
    let line = input
        .next_line()
        .await
        .context("failed to read input")?
        .context("no subject chosen")?;
    let choice = line.trim();
    let picked = choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| subjects.get(i));
    Ok(picked.cloned().unwrap_or_else(|| choice.to_string()))
}

async fn run_session(
    engine: &mut SessionEngine,
    state: &mut SessionState,
    input: &mut Lines<BufReader<Stdin>>,
) -> Result<Ending> {
    let (mut timer, mut ticks) = QuestionTimer::new(Duration::from_secs(1));
    let current = state.current_index();
    let shown = engine.present(state, current)?;
    timer.follow(shown.index);
    print_question(&shown);

    let ending = loop {
        tokio::select! {
            line = input.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break Ending::Abandoned;
                };
                match parse_command(&line) {
                    Command::Choose(slot) => {
                        let index = state.current_index();
                        match engine.select(state, index, slot) {
                            Ok(_) => println!("Selected option {}.", slot + 1),
                            Err(e) => println!("{e}"),
                        }
                    }
                    Command::Next => match engine.advance(state) {
                        Ok(AdvanceOutcome::Moved(shown)) => {
                            timer.follow(shown.index);
                            print_question(&shown);
                        }
                        Ok(AdvanceOutcome::Completed(summary)) => break Ending::Finished(summary),
                        Err(e) if e.kind() == ErrorKind::Io => {
                            timer.stop();
                            eprintln!("Could not record the score: {e}. Type n to retry or q to quit.");
                        }
                        Err(e) => return Err(e.into()),
                    },
                    Command::Back => match engine.retreat(state) {
                        Ok(shown) => {
                            timer.follow(shown.index);
                            print_question(&shown);
                        }
                        Err(SessionError::AtFirstQuestion) => println!("Already at the first question."),
                        Err(e) => return Err(e.into()),
                    },
                    Command::Quit => break Ending::Abandoned,
                    Command::Show => {
                        let current = state.current_index();
                        let shown = engine.present(state, current)?;
                        print_question(&shown);
                    }
                    Command::Help => print_help(),
                    Command::Empty => {}
                    Command::Unknown(text) => println!("Unknown command {text:?}. Type ? for help."),
                }
            }
            Some(tick) = ticks.recv() => {
                if !timer.is_current(&tick) {
                    continue;
                }
                match engine.tick(state) {
                    Ok(TickOutcome::Running { time_left }) => {
                        if time_left == TIME_WARNING_SECS {
                            println!("{TIME_WARNING_SECS} seconds left.");
                        }
                    }
                    Ok(TickOutcome::Expired(AdvanceOutcome::Moved(shown))) => {
                        println!("Time is up.");
                        timer.follow(shown.index);
                        print_question(&shown);
                    }
                    Ok(TickOutcome::Expired(AdvanceOutcome::Completed(summary))) => {
                        println!("Time is up.");
                        break Ending::Finished(summary);
                    }
                    Err(e) if e.kind() == ErrorKind::Io => {
                        timer.stop();
                        eprintln!("Could not record the score: {e}. Type n to retry or q to quit.");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    };

    timer.stop();
    Ok(ending)
}

fn print_question(shown: &Presentation) {
    println!();
    println!(
        "Question {}/{} ({}%)  [{}s]",
        shown.index + 1,
        shown.total,
        shown.progress_percent(),
        shown.time_left
    );
    println!("{}", shown.prompt);
    for (slot, option) in shown.options.iter().enumerate() {
        let marker = if shown.selected == Some(slot) { "*" } else { " " };
        println!(" {marker}{}) {option}", slot + 1);
    }
    if shown.changed_since_last_seen {
        println!("Note: this question was updated since your last session.");
    }
    if shown.is_last() {
        println!("(last question: n to finish)");
    }
}

fn print_help() {
    println!("Commands: 1-{OPTION_COUNT} choose an option, n next, b back, s show, q quit");
}

fn finish(
    state: &SessionState,
    summary: &SessionSummary,
    args: &TakeArgs,
    config: &QuizlineConfig,
) -> Result<()> {
    let tally = summary.tally;
    println!();
    println!(
        "Session complete: {}/{} correct ({}%)",
        tally.correct,
        tally.total(),
        tally.percent()
    );
    println!("{}", tally.bar_chart(CHART_WIDTH));
    if !summary.versions_persisted {
        eprintln!("Warning: question versions were not saved; change notes may be missing next time.");
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result", "Note"]);
    for row in review_rows(state) {
        table.add_row(vec![
            Cell::new(row.number),
            Cell::new(&row.prompt),
            Cell::new(row.your_answer.as_deref().unwrap_or("")),
            Cell::new(&row.correct_answer),
            Cell::new(row.result_label()),
            Cell::new(if row.changed_since_last_seen { "updated" } else { "" }),
        ]);
    }
    println!("{table}");

    let options = LayoutOptions {
        blocks_per_page: config.blocks_per_page,
        wrap_columns: config.wrap_columns,
        explanation_lines_per_page: config.explanation_lines_per_page,
        ..LayoutOptions::default()
    };

    if let Some(target) = &args.export {
        let outcome = export_review(state, target, &options)?;
        match (&outcome.document, &outcome.document_error) {
            (Some(path), _) => println!("Review exported to {}", path.display()),
            (None, Some(e)) => eprintln!("Warning: PDF export failed: {e}"),
            (None, None) => {}
        }
        println!("Fallback image saved to {}", outcome.image.display());
    }

    if let Some(target) = &args.explanations {
        let path = export_explanations(state, target, &options)?;
        println!("Explanations exported to {}", path.display());
    }

    Ok(())
}
