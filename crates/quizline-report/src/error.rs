use std::path::PathBuf;

use quizline_core::error::ErrorKind;
use thiserror::Error;

/// Errors from exporting review artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Exports read the frozen state of a finished session only.
    #[error("session is still in progress")]
    SessionInProgress,

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl ReportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReportError::SessionInProgress => ErrorKind::State,
            ReportError::Io { .. } | ReportError::Image { .. } => ErrorKind::Io,
        }
    }
}
