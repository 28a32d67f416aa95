//! quizline CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizline", version, about = "Timed multiple-choice assessments")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a timed assessment
    Take(commands::take::TakeArgs),

    /// Manage the score ledger
    Scores {
        #[command(subcommand)]
        action: ScoresAction,
    },

    /// Register or check a user
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Check a question bank and report skipped entries
    Validate {
        /// Question bank JSON (defaults to the configured bank)
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[derive(Subcommand)]
enum ScoresAction {
    /// List recorded scores
    List {
        /// Only rows for this roll number
        #[arg(long)]
        roll: Option<String>,

        /// Print rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a score by hand
    Add {
        #[arg(long)]
        roll: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        class: String,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        score: String,
        #[arg(long)]
        total: String,
    },

    /// Delete every row for a roll number
    Delete {
        #[arg(long)]
        roll: String,
    },

    /// Delete the whole score ledger
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },

    /// Check a username and password
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizline=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Take(args) => commands::take::execute(args, config).await,
        Commands::Scores { action } => match action {
            ScoresAction::List { roll, json } => commands::scores::list(roll, json, config),
            ScoresAction::Add {
                roll,
                name,
                class,
                subject,
                score,
                total,
            } => commands::scores::add(
                quizline_core::ledger::ScoreInput {
                    roll,
                    name,
                    class,
                    subject,
                    score,
                    total,
                },
                config,
            ),
            ScoresAction::Delete { roll } => commands::scores::delete(roll, config),
            ScoresAction::Clear { yes } => commands::scores::clear(yes, config),
        },
        Commands::User { action } => match action {
            UserAction::Register { username, password } => {
                commands::user::register(username, password, config)
            }
            UserAction::Login { username, password } => {
                commands::user::login(username, password, config)
            }
        },
        Commands::Validate { bank } => commands::validate::execute(bank, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
