//! Post-session review: one row per question, in session order.

use serde::Serialize;

use crate::session::SessionState;

/// Prompt length shown in review rows before truncation.
pub const REVIEW_PROMPT_CHARS: usize = 80;

/// Placeholder used when a question has no explanation.
pub const NO_EXPLANATION: &str = "(no explanation provided)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    /// 1-based position in the session.
    pub number: usize,
    pub prompt: String,
    /// Text of the chosen option, `None` if unanswered.
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
    pub changed_since_last_seen: bool,
}

impl ReviewRow {
    pub fn result_label(&self) -> &'static str {
        if self.is_correct {
            "Correct"
        } else {
            "Incorrect"
        }
    }
}

/// Review rows with prompts truncated to [`REVIEW_PROMPT_CHARS`].
pub fn review_rows(state: &SessionState) -> Vec<ReviewRow> {
    state
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| ReviewRow {
            number: i + 1,
            prompt: truncate(item.question.prompt(), REVIEW_PROMPT_CHARS),
            your_answer: item.answer_text().map(String::from),
            correct_answer: item.question.correct_answer().to_string(),
            is_correct: item.is_correct(),
            explanation: item.question.explanation().to_string(),
            changed_since_last_seen: item.changed_since_last_seen,
        })
        .collect()
}

/// Cut `s` to at most `max` characters, ending in `...` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// A question with its explanation, for the explanations listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplanationEntry {
    pub number: usize,
    pub prompt: String,
    pub correct_answer: String,
    pub explanation: String,
}

/// Every session question with its full prompt and explanation.
pub fn explanation_entries(state: &SessionState) -> Vec<ExplanationEntry> {
    state
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let explanation = match item.question.explanation().trim() {
                "" => NO_EXPLANATION.to_string(),
                text => text.to_string(),
            };
            ExplanationEntry {
                number: i + 1,
                prompt: item.question.prompt().to_string(),
                correct_answer: item.question.correct_answer().to_string(),
                explanation,
            }
        })
        .collect()
}
