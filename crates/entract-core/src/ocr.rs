use std::path::Path;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    NotAvailable(String),
    #[error("OCR failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for OCR engines.
///
/// Best-effort recognition of a rendered page image; no confidence threshold
/// is applied anywhere in the pipeline.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, OcrError>;
}
