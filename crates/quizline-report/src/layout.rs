//! Text layout for the review and explanations documents.
//!
//! Layouts produce plain lines. The review document paginates by question
//! block count; the explanations document paginates by line count.

use quizline_core::review::explanation_entries;
use quizline_core::session::{SessionItem, SessionState};

use crate::pdf::{Document, DocumentBuilder};
use crate::wrap::{wrap, wrap_indented};

pub const REVIEW_TITLE: &str = "Quizline - Review Report";
pub const EXPLANATIONS_TITLE: &str = "Quizline - Explanations";
pub const NO_ANSWER: &str = "<no answer>";
pub const CHANGED_NOTE: &str = "Note: Question updated since last session.";

const INDENT: &str = "   ";

/// Pagination and wrapping parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    pub blocks_per_page: usize,
    pub wrap_columns: usize,
    pub explanation_lines_per_page: usize,
    pub explanation_wrap_columns: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            blocks_per_page: 6,
            wrap_columns: 90,
            explanation_lines_per_page: 60,
            explanation_wrap_columns: 95,
        }
    }
}

/// `Student: ...   Roll: ...   Class: ...   Subject: ...`
pub fn candidate_line(state: &SessionState) -> String {
    format!("{}   Subject: {}", state.candidate(), state.subject())
}

fn session_line(state: &SessionState) -> String {
    format!(
        "Session: {}   Started: {}",
        state.id(),
        state.started_at().format("%Y-%m-%d %H:%M UTC")
    )
}

/// Lines for one question block.
pub fn block_lines(number: usize, item: &SessionItem, columns: usize) -> Vec<String> {
    let mut lines = wrap(&format!("{number}. {}", item.question.prompt()), columns);
    let your = item.answer_text().unwrap_or(NO_ANSWER);
    lines.extend(wrap_indented(&format!("Your: {your}"), columns, INDENT));
    lines.extend(wrap_indented(
        &format!("Correct: {}", item.question.correct_answer()),
        columns,
        INDENT,
    ));
    let explanation = item.question.explanation().trim();
    if !explanation.is_empty() {
        lines.extend(wrap_indented(
            &format!("Explanation: {explanation}"),
            columns,
            INDENT,
        ));
    }
    if item.changed_since_last_seen {
        lines.push(format!("{INDENT}{CHANGED_NOTE}"));
    }
    lines.push(String::new());
    lines
}

/// Review pages: a header on every page, then at most `blocks_per_page`
/// question blocks.
pub fn review_pages(state: &SessionState, options: &LayoutOptions) -> Vec<Vec<String>> {
    let per_page = options.blocks_per_page.max(1);
    let items = state.items();
    let total_pages = items.len().div_ceil(per_page).max(1);

    (0..total_pages)
        .map(|page| {
            let mut lines = vec![
                REVIEW_TITLE.to_string(),
                candidate_line(state),
                session_line(state),
                format!("Page {} of {total_pages}", page + 1),
                String::new(),
            ];
            let start = page * per_page;
            let end = items.len().min(start + per_page);
            for (i, item) in items[start..end].iter().enumerate() {
                lines.extend(block_lines(start + i + 1, item, options.wrap_columns));
            }
            lines
        })
        .collect()
}

pub fn review_document(state: &SessionState, options: &LayoutOptions) -> Document {
    let mut builder = DocumentBuilder::new();
    for page in review_pages(state, options) {
        builder.add_page(page);
    }
    builder.finish()
}

/// Every line of the explanations listing, already wrapped.
pub fn explanation_lines(state: &SessionState, columns: usize) -> Vec<String> {
    let mut paragraphs = vec![
        EXPLANATIONS_TITLE.to_string(),
        candidate_line(state),
        String::new(),
    ];
    for entry in explanation_entries(state) {
        paragraphs.push(format!("{}. {}", entry.number, entry.prompt));
        paragraphs.push(format!("Explanation: {}", entry.explanation));
        paragraphs.push(String::new());
    }

    paragraphs
        .iter()
        .flat_map(|p| wrap(p, columns))
        .collect()
}

pub fn explanations_document(state: &SessionState, options: &LayoutOptions) -> Document {
    let lines = explanation_lines(state, options.explanation_wrap_columns);
    let mut builder = DocumentBuilder::new();
    for chunk in lines.chunks(options.explanation_lines_per_page.max(1)) {
        builder.add_page(chunk.to_vec());
    }
    builder.finish()
}

/// All review content on one continuous sheet, for the raster fallback.
pub fn review_sheet(state: &SessionState, columns: usize) -> Vec<String> {
    let mut lines = vec![
        REVIEW_TITLE.to_string(),
        candidate_line(state),
        session_line(state),
        String::new(),
    ];
    for (i, item) in state.items().iter().enumerate() {
        lines.extend(block_lines(i + 1, item, columns));
    }
    lines
        .into_iter()
        .flat_map(|line| {
            if line.chars().count() > columns {
                wrap(&line, columns)
            } else {
                vec![line]
            }
        })
        .collect()
}
