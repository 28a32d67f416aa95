//! quizline configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `data_dir`.
pub const DATA_DIR_ENV: &str = "QUIZLINE_DATA_DIR";

const SCORES_FILE: &str = "scores.csv";
const VERSIONS_FILE: &str = "qversions";
const USERS_FILE: &str = "users";

/// Top-level quizline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizlineConfig {
    /// JSON question bank.
    #[serde(default = "default_question_bank")]
    pub question_bank: PathBuf,
    /// Directory holding the score ledger, version ledger and users file.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Countdown per question.
    #[serde(default = "default_seconds_per_question")]
    pub seconds_per_question: u32,
    /// Question blocks per review document page.
    #[serde(default = "default_blocks_per_page")]
    pub blocks_per_page: usize,
    /// Column width for prompts in the review document.
    #[serde(default = "default_wrap_columns")]
    pub wrap_columns: usize,
    /// Lines per explanations document page.
    #[serde(default = "default_explanation_lines_per_page")]
    pub explanation_lines_per_page: usize,
    /// Subjects offered when none is given on the command line.
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
}

fn default_question_bank() -> PathBuf {
    PathBuf::from("questions.json")
}
fn default_data_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".quizline"),
        Err(_) => PathBuf::from(".quizline"),
    }
}
fn default_seconds_per_question() -> u32 {
    60
}
fn default_blocks_per_page() -> usize {
    6
}
fn default_wrap_columns() -> usize {
    90
}
fn default_explanation_lines_per_page() -> usize {
    60
}
fn default_subjects() -> Vec<String> {
    ["Physics", "Chemistry", "Biology"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for QuizlineConfig {
    fn default() -> Self {
        Self {
            question_bank: default_question_bank(),
            data_dir: default_data_dir(),
            seconds_per_question: default_seconds_per_question(),
            blocks_per_page: default_blocks_per_page(),
            wrap_columns: default_wrap_columns(),
            explanation_lines_per_page: default_explanation_lines_per_page(),
            subjects: default_subjects(),
        }
    }
}

impl QuizlineConfig {
    pub fn scores_path(&self) -> PathBuf {
        self.data_dir.join(SCORES_FILE)
    }

    pub fn versions_path(&self) -> PathBuf {
        self.data_dir.join(VERSIONS_FILE)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    /// Replace `data_dir` when an override is set and non-empty.
    pub fn with_data_dir_override(mut self, data_dir: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = PathBuf::from(resolve_env_vars(&dir));
        }
        self
    }

    fn resolve_paths(mut self) -> Self {
        self.question_bank = resolve_path(&self.question_bank);
        self.data_dir = resolve_path(&self.data_dir);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.seconds_per_question == 0 {
            anyhow::bail!("seconds_per_question must be at least 1");
        }
        if self.blocks_per_page == 0 || self.explanation_lines_per_page == 0 {
            anyhow::bail!("page sizes must be at least 1");
        }
        if self.wrap_columns < 10 {
            anyhow::bail!("wrap_columns must be at least 10");
        }
        Ok(())
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `quizline.toml` in the current directory
/// 2. `~/.config/quizline/config.toml`
/// 3. built-in defaults
///
/// `QUIZLINE_DATA_DIR` overrides `data_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizlineConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizline.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizlineConfig::default(),
    };

    let config = config.with_data_dir_override(std::env::var(DATA_DIR_ENV).ok());
    config.validate()?;
    Ok(config)
}

/// Parse TOML config text and expand `${VAR}` references in its paths.
pub fn parse_config(content: &str) -> Result<QuizlineConfig> {
    let config = toml::from_str::<QuizlineConfig>(content)?;
    Ok(config.resolve_paths())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizline"))
}

/// Starter config written by `quizline init`.
pub fn sample_config() -> String {
    r#"# quizline configuration
question_bank = "questions.json"
data_dir = ".quizline"
seconds_per_question = 60
blocks_per_page = 6
wrap_columns = 90
explanation_lines_per_page = 60
subjects = ["Physics", "Chemistry", "Biology"]
"#
    .to_string()
}
