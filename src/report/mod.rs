//! Reporting: insight summaries, terminal formatting and the PDF report.

use thiserror::Error;

pub mod format;
pub mod insight;
pub mod pdf;

pub use format::*;
pub use insight::*;
pub use pdf::render_pdf;

/// Report rendering failure.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}
