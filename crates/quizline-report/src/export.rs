//! Writing review artifacts to disk.
//!
//! The PDF is best effort: a failure is logged and reported in the outcome.
//! The PNG is always attempted and its failure is an error.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use quizline_core::session::SessionState;

use crate::error::ReportError;
use crate::layout::{explanations_document, review_document, review_sheet, LayoutOptions};
use crate::raster::{render_lines, COLUMNS};

/// Where the two review artifacts go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub document: PathBuf,
    pub image: PathBuf,
}

impl ExportPaths {
    /// `target` with `.pdf` appended if missing, and its `.png` sibling.
    pub fn for_target(target: &Path) -> Self {
        let document = pdf_path(target);
        let image = document.with_extension("png");
        Self { document, image }
    }
}

/// `target`, with `.pdf` appended unless it already ends in `.pdf`.
pub fn pdf_path(target: &Path) -> PathBuf {
    let is_pdf = target
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
    if is_pdf {
        return target.to_path_buf();
    }
    let mut name = OsString::from(target.as_os_str());
    name.push(".pdf");
    PathBuf::from(name)
}

/// What a review export produced.
#[derive(Debug)]
pub struct ExportOutcome {
    /// The PDF path, if it was written.
    pub document: Option<PathBuf>,
    /// Why the PDF was not written.
    pub document_error: Option<ReportError>,
    pub image: PathBuf,
}

/// Export the review of a completed session as a PDF plus a PNG fallback.
pub fn export_review(
    state: &SessionState,
    target: &Path,
    options: &LayoutOptions,
) -> Result<ExportOutcome, ReportError> {
    if !state.is_completed() {
        return Err(ReportError::SessionInProgress);
    }
    let paths = ExportPaths::for_target(target);

    let (document, document_error) = match write_review_pdf(state, &paths.document, options) {
        Ok(()) => {
            tracing::info!(path = %paths.document.display(), "review document written");
            (Some(paths.document.clone()), None)
        }
        Err(e) => {
            tracing::warn!("review document not written: {e}");
            (None, Some(e))
        }
    };

    let image = render_lines(&review_sheet(state, COLUMNS));
    if let Some(parent) = paths.image.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    image
        .save_with_format(&paths.image, ImageFormat::Png)
        .map_err(|source| ReportError::Image {
            path: paths.image.clone(),
            source,
        })?;
    tracing::info!(path = %paths.image.display(), "review image written");

    Ok(ExportOutcome {
        document,
        document_error,
        image: paths.image,
    })
}

fn write_review_pdf(
    state: &SessionState,
    path: &Path,
    options: &LayoutOptions,
) -> Result<(), ReportError> {
    review_document(state, options)
        .write_to(path)
        .map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Export every session question with its explanation as a PDF.
pub fn export_explanations(
    state: &SessionState,
    target: &Path,
    options: &LayoutOptions,
) -> Result<PathBuf, ReportError> {
    if !state.is_completed() {
        return Err(ReportError::SessionInProgress);
    }
    let path = pdf_path(target);
    explanations_document(state, options)
        .write_to(&path)
        .map_err(|source| ReportError::Io {
            path: path.clone(),
            source,
        })?;
    tracing::info!(path = %path.display(), "explanations document written");
    Ok(path)
}
