//! quizline-report — Review export.
//!
//! Turns a completed session into a hand-built PDF (review or explanations)
//! and a PNG fallback that is always produced.

pub mod error;
pub mod export;
pub mod layout;
pub mod pdf;
pub mod raster;
pub mod wrap;

#[cfg(test)]
mod test_support;

pub use error::ReportError;
pub use export::{export_explanations, export_review, ExportOutcome, ExportPaths};
pub use layout::LayoutOptions;
