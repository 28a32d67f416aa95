//! Correct/incorrect tallies for a session.

use serde::Serialize;

/// Final counts for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionTally {
    pub correct: usize,
    pub incorrect: usize,
}

impl SessionTally {
    pub fn total(&self) -> usize {
        self.correct + self.incorrect
    }

    /// Integer percentage, rounded down. Zero for an empty session.
    pub fn percent(&self) -> usize {
        match self.total() {
            0 => 0,
            total => self.correct * 100 / total,
        }
    }

    /// Render a two-bar text chart, `width` cells for a full bar.
    pub fn bar_chart(&self, width: usize) -> String {
        let total = self.total().max(1);
        let bar = |n: usize| "#".repeat((n * width + total / 2) / total);
        format!(
            "Correct   | {:<width$} {}\nIncorrect | {:<width$} {}",
            bar(self.correct),
            self.correct,
            bar(self.incorrect),
            self.incorrect,
        )
    }
}
