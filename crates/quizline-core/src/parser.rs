//! JSON question bank loader.
//!
//! Each element of the bank is decoded and validated on its own, so a
//! malformed entry is skipped with a diagnostic instead of failing the load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::QuestionBankError;
use crate::model::{Question, OPTION_COUNT};

/// Intermediate structure for one question object in the bank.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Something noteworthy about a single bank entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankDiagnostic {
    /// Zero-based position of the entry in the bank.
    pub position: usize,
    /// Whether the entry was dropped.
    pub skipped: bool,
    pub message: String,
}

/// Result of loading a question bank.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    pub questions: Vec<Question>,
    pub diagnostics: Vec<BankDiagnostic>,
}

impl QuestionBank {
    /// Questions for `subject`, compared case-insensitively, in bank order.
    pub fn for_subject(&self, subject: &str) -> Vec<Question> {
        filter_by_subject(&self.questions, subject)
    }

    /// Number of accepted questions per subject.
    pub fn subject_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for q in &self.questions {
            *counts.entry(q.subject().to_string()).or_insert(0) += 1;
        }
        counts
    }

    pub fn skipped(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.skipped).count()
    }
}

/// Case-insensitive exact subject filter.
pub fn filter_by_subject(questions: &[Question], subject: &str) -> Vec<Question> {
    questions
        .iter()
        .filter(|q| q.is_subject(subject))
        .cloned()
        .collect()
}

/// Load the bank at `path`, returning an empty bank if the file is absent.
///
/// This is the lenient entry point used when starting a session: a missing
/// or unreadable bank is logged and yields no questions.
pub fn load_questions(path: &Path) -> QuestionBank {
    match parse_question_bank(path) {
        Ok(bank) => bank,
        Err(e) => {
            tracing::warn!("{e}");
            QuestionBank::default()
        }
    }
}

/// Read and parse the bank at `path`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank, QuestionBankError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(QuestionBankError::NotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(QuestionBankError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_question_bank_str(&content)
}

/// Parse bank JSON from a string (useful for testing).
pub fn parse_question_bank_str(content: &str) -> Result<QuestionBank, QuestionBankError> {
    let root: Value =
        serde_json::from_str(content).map_err(|e| QuestionBankError::Malformed(e.to_string()))?;

    let entries = match root {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("questions") {
            Some(Value::Array(items)) => items,
            _ => return Err(QuestionBankError::UnexpectedShape),
        },
        _ => return Err(QuestionBankError::UnexpectedShape),
    };

    let mut bank = QuestionBank::default();
    for (position, entry) in entries.into_iter().enumerate() {
        match validate_entry(entry) {
            Ok((question, matched)) => {
                if !matched {
                    tracing::warn!(
                        position,
                        "answer matches no option, first option will be scored as correct"
                    );
                    bank.diagnostics.push(BankDiagnostic {
                        position,
                        skipped: false,
                        message: "answer matches no option; defaulting to the first option".into(),
                    });
                }
                bank.questions.push(question);
            }
            Err(reason) => {
                tracing::warn!(position, "skipping malformed question: {reason}");
                bank.diagnostics.push(BankDiagnostic {
                    position,
                    skipped: true,
                    message: reason,
                });
            }
        }
    }

    tracing::debug!(
        accepted = bank.questions.len(),
        skipped = bank.skipped(),
        "question bank parsed"
    );
    Ok(bank)
}

/// Validate one entry. On success also reports whether the answer text
/// matched one of the options.
fn validate_entry(entry: Value) -> Result<(Question, bool), String> {
    let raw: RawQuestion =
        serde_json::from_value(entry).map_err(|e| format!("not a question object: {e}"))?;

    let subject = required(raw.subject, "subject")?;
    let prompt = required(raw.question, "question")?;
    let answer = required(raw.answer, "answer")?;

    let options = raw.options.ok_or_else(|| "missing options".to_string())?;
    let found = options.len();
    let options: [String; OPTION_COUNT] = options
        .into_iter()
        .map(|o| o.trim().to_string())
        .collect::<Vec<_>>()
        .try_into()
        .map_err(|_| format!("expected {OPTION_COUNT} options, found {found}"))?;

    let matched = options.iter().position(|o| *o == answer);
    let correct_index = matched.unwrap_or(0);
    let explanation = raw.explanation.map(|e| e.trim().to_string()).unwrap_or_default();

    let question = Question::new(subject, prompt, options, correct_index, explanation)
        .ok_or_else(|| "correct index out of range".to_string())?;
    Ok((question, matched.is_some()))
}

fn required(value: Option<String>, field: &str) -> Result<String, String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(format!("missing or empty {field}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_BANK: &str = r#"[
  {
    "subject": "Physics",
    "question": "What is the SI unit of force?",
    "options": ["Joule", "Newton", "Watt", "Pascal"],
    "answer": "Newton",
    "explanation": "Force is measured in newtons."
  },
  {
    "subject": "Chemistry",
    "question": "What is H2O?",
    "options": ["Salt", "Water", "Acid", "Base"],
    "answer": "Water"
  }
]"#;

    #[test]
    fn parse_valid_bank() {
        let bank = parse_question_bank_str(VALID_BANK).unwrap();
        assert_eq!(bank.questions.len(), 2);
        assert!(bank.diagnostics.is_empty());
        let q = &bank.questions[0];
        assert_eq!(q.subject(), "Physics");
        assert_eq!(q.correct_index(), 1);
        assert_eq!(q.explanation(), "Force is measured in newtons.");
        assert_eq!(bank.questions[1].explanation(), "");
    }

    #[test]
    fn accepts_questions_wrapper_object() {
        let json = format!(r#"{{ "questions": {VALID_BANK} }}"#);
        let bank = parse_question_bank_str(&json).unwrap();
        assert_eq!(bank.questions.len(), 2);
    }

    #[test]
    fn skips_malformed_entries() {
        let json = r#"[
  { "subject": "Physics", "question": "Three options", "options": ["a", "b", "c"], "answer": "a" },
  { "subject": "", "question": "No subject", "options": ["a", "b", "c", "d"], "answer": "a" },
  { "subject": "Physics", "question": "No answer", "options": ["a", "b", "c", "d"] },
  "just a string",
  { "subject": "Physics", "question": "Good", "options": ["a", "b", "c", "d"], "answer": "c" }
]"#;
        let bank = parse_question_bank_str(json).unwrap();
        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.questions[0].correct_index(), 2);
        assert_eq!(bank.skipped(), 4);
        assert!(bank.diagnostics[0].message.contains("found 3"));
        assert_eq!(bank.diagnostics[3].position, 3);
    }

    #[test]
    fn first_matching_option_wins() {
        let json = r#"[{ "subject": "Biology", "question": "Dup", "options": ["x", "y", "y", "z"], "answer": "y" }]"#;
        let bank = parse_question_bank_str(json).unwrap();
        assert_eq!(bank.questions[0].correct_index(), 1);
    }

    #[test]
    fn unmatched_answer_defaults_to_first_option_with_diagnostic() {
        let json = r#"[{ "subject": "Biology", "question": "Odd", "options": ["a", "b", "c", "d"], "answer": "e" }]"#;
        let bank = parse_question_bank_str(json).unwrap();
        assert_eq!(bank.questions.len(), 1);
        assert_eq!(bank.questions[0].correct_index(), 0);
        assert_eq!(bank.diagnostics.len(), 1);
        assert!(!bank.diagnostics[0].skipped);
    }

    #[test]
    fn subject_filter_and_counts() {
        let bank = parse_question_bank_str(VALID_BANK).unwrap();
        assert_eq!(bank.for_subject("physics").len(), 1);
        assert!(bank.for_subject("Biology").is_empty());
        let counts = bank.subject_counts();
        assert_eq!(counts.get("Chemistry"), Some(&1));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let result = parse_question_bank_str("{ not json");
        assert!(matches!(result, Err(QuestionBankError::Malformed(_))));
        let result = parse_question_bank_str("42");
        assert!(matches!(result, Err(QuestionBankError::UnexpectedShape)));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        assert!(matches!(
            parse_question_bank(&path),
            Err(QuestionBankError::NotFound(_))
        ));
        assert!(load_questions(&path).questions.is_empty());
    }
}
