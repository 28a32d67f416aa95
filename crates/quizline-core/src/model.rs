//! Core data model types for quizline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every question offers exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// A validated multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    subject: String,
    prompt: String,
    options: [String; OPTION_COUNT],
    correct_index: usize,
    explanation: String,
}

impl Question {
    /// Build a question. Returns `None` if `correct_index` does not index
    /// into the options.
    pub fn new(
        subject: impl Into<String>,
        prompt: impl Into<String>,
        options: [String; OPTION_COUNT],
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Option<Self> {
        if correct_index >= OPTION_COUNT {
            return None;
        }
        Some(Self {
            subject: subject.into(),
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: explanation.into(),
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in their original order.
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }

    /// May be empty.
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Case-insensitive exact subject match.
    pub fn is_subject(&self, subject: &str) -> bool {
        self.subject.to_lowercase() == subject.trim().to_lowercase()
    }
}

/// The person taking an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub roll: String,
    pub name: String,
    pub class: String,
}

impl Candidate {
    pub fn new(
        roll: impl Into<String>,
        name: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        Self {
            roll: roll.into().trim().to_string(),
            name: name.into().trim().to_string(),
            class: class.into().trim().to_string(),
        }
    }

    /// Name of the first empty field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.roll.is_empty() {
            Some("roll")
        } else if self.name.is_empty() {
            Some("name")
        } else if self.class.is_empty() {
            Some("class")
        } else {
            None
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Student: {}   Roll: {}   Class: {}",
            self.name, self.roll, self.class
        )
    }
}
