use std::path::{Path, PathBuf};

use tempfile::TempDir;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract text: {0}")]
    Extraction(String),
    #[error("failed to render page: {0}")]
    Render(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF parsing backends.
///
/// Implementors provide page-ordered access to a document parsed from memory;
/// the extraction pipeline ([`crate::TextExtractor`]) owns the text-layer /
/// OCR fallback policy.
pub trait PdfBackend: Send + Sync {
    /// Parse a document from raw bytes.
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError>;
}

/// A parsed PDF with pages in document order.
pub trait PdfDocument {
    fn page_count(&self) -> usize;

    /// The page's text layer in reading order. Empty when the page has no
    /// extractable text (e.g. a scanned image).
    fn page_text(&self, index: usize) -> Result<String, BackendError>;

    /// Render the page to an image suitable for OCR.
    fn render_page(&self, index: usize) -> Result<PageImage, BackendError>;
}

/// A rendered page image staged on disk for the OCR engine.
///
/// Owns the temp directory holding the file; dropping the value removes the
/// image no matter how the extraction call ends.
pub struct PageImage {
    path: PathBuf,
    _dir: TempDir,
}

impl PageImage {
    pub fn new(dir: TempDir, path: PathBuf) -> Self {
        Self { path, _dir: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
