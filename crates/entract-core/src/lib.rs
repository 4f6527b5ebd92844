pub mod backend;
pub mod extract;
pub mod ner;
pub mod ocr;

// Re-export for convenience
pub use backend::{BackendError, PageImage, PdfBackend, PdfDocument};
pub use extract::{ExtractError, TextExtractor, decode_text};
pub use ner::{Entity, EntityRecognizer, NerError};
pub use ocr::{OcrEngine, OcrError};

/// How an uploaded document should be processed, derived from its declared
/// file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// Anything that is not a PDF is treated as plain text.
    Text,
}

impl DocumentKind {
    /// Classify by file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case("pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Text
        }
    }

    /// Classify by filename: the extension is whatever follows the last `.`.
    /// A name without a dot classifies as plain text.
    pub fn from_filename(name: &str) -> Self {
        Self::from_extension(name.rsplit('.').next().unwrap_or(""))
    }
}
