//! Text extraction from uploaded syllabus documents.
//!
//! The generation pipeline only sees the [`TextExtractor`] trait; the
//! concrete parsing libraries live behind [`DocumentExtractor`] so they can
//! be swapped without touching prompt or parsing code.

pub mod pdf;
pub mod spreadsheet;

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// MIME type accepted for PDF uploads.
pub const PDF_MIME: &str = "application/pdf";

/// MIME type accepted for spreadsheet uploads (`.xlsx`).
pub const SPREADSHEET_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Errors from turning a document into plain text.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    #[error("PDF is encrypted or password protected")]
    Encrypted,

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// The two supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Spreadsheet,
}

impl DocumentKind {
    /// Map an upload MIME type to a document kind.
    ///
    /// Only the two exact MIME types are accepted; anything else is `None`
    /// and must be rejected before the pipeline runs.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim() {
            PDF_MIME => Some(Self::Pdf),
            SPREADSHEET_MIME => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Guess the kind from a file extension (`.pdf` or `.xlsx`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// The MIME type for this kind.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MIME,
            Self::Spreadsheet => SPREADSHEET_MIME,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pdf => f.write_str("pdf"),
            Self::Spreadsheet => f.write_str("spreadsheet"),
        }
    }
}

/// Converts document bytes into plain text.
///
/// Implementations are synchronous; the pipeline runs them on the blocking
/// thread pool.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError>;
}

/// Default extractor: `lopdf` for PDFs, `calamine` for spreadsheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
        match kind {
            DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
            DocumentKind::Spreadsheet => spreadsheet::extract_spreadsheet_text(bytes),
        }
    }
}

// Compile-time assertion: TextExtractor must be usable as `dyn TextExtractor`.
const _: () = {
    fn _assert_object_safe(_: &dyn TextExtractor) {}
};
