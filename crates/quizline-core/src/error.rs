//! Error types shared across quizline.
//!
//! Each store and the session engine has its own error enum. All of them
//! classify into an [`ErrorKind`] so callers can decide whether to re-prompt,
//! treat the condition as empty state, or abort, without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of every quizline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Empty or malformed required input. Recoverable, re-prompt.
    Validation,
    /// A backing file is missing. Recoverable, treated as empty state.
    NotFound,
    /// Read or write failure on a ledger or artifact. Operation aborted.
    Io,
    /// Operation is invalid in the current session state. No-op plus notice.
    State,
}

/// Errors from loading the question bank.
#[derive(Debug, Error)]
pub enum QuestionBankError {
    /// The question bank file does not exist.
    #[error("question bank not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but is not a JSON document at all.
    #[error("question bank is not valid JSON: {0}")]
    Malformed(String),

    /// The top-level JSON value is neither an array nor a `questions` object.
    #[error("question bank must be an array of questions or an object with a `questions` array")]
    UnexpectedShape,

    #[error("failed to read question bank {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QuestionBankError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuestionBankError::NotFound(_) => ErrorKind::NotFound,
            QuestionBankError::Malformed(_) | QuestionBankError::UnexpectedShape => {
                ErrorKind::Validation
            }
            QuestionBankError::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Errors from the score ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Score or total is not an integer.
    #[error("invalid input for {field}: {value:?} is not an integer")]
    InvalidInput { field: &'static str, value: String },

    /// A required field is empty.
    #[error("{0} must not be empty")]
    Validation(&'static str),

    #[error("score ledger I/O failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidInput { .. } | LedgerError::Validation(_) => ErrorKind::Validation,
            LedgerError::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Errors from the question version ledger.
#[derive(Debug, Error)]
pub enum VersionLedgerError {
    #[error("version ledger I/O failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VersionLedgerError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Io
    }
}

/// Errors from the credential store.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("credential store I/O failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::Validation,
            AuthError::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Errors raised by the session engine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The subject filter matched no questions.
    #[error("no questions available for subject {0:?}")]
    NoQuestionsAvailable(String),

    /// Candidate details are incomplete.
    #[error("{0} must not be empty")]
    Validation(&'static str),

    /// The session has been finalized and is read-only.
    #[error("session already completed")]
    Completed,

    /// `retreat` was called on the first question.
    #[error("already at the first question")]
    AtFirstQuestion,

    #[error("question {index} is out of range (session has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("slot {0} is out of range (expected 0..4)")]
    InvalidSlot(usize),

    /// An answer was recorded for a question that was never shown.
    #[error("question {0} has not been presented yet")]
    NotPresented(usize),

    /// Finalization could not append to the score ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NoQuestionsAvailable(_)
            | SessionError::Completed
            | SessionError::AtFirstQuestion
            | SessionError::QuestionOutOfRange { .. }
            | SessionError::NotPresented(_) => ErrorKind::State,
            SessionError::Validation(_) | SessionError::InvalidSlot(_) => ErrorKind::Validation,
            SessionError::Ledger(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_errors_classify() {
        let err = LedgerError::InvalidInput {
            field: "score",
            value: "ten".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("\"ten\""));
    }

    #[test]
    fn session_ledger_error_keeps_io_kind() {
        let err = SessionError::from(LedgerError::Io {
            path: PathBuf::from("scores.csv"),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(SessionError::AtFirstQuestion.kind(), ErrorKind::State);
    }
}
