use std::sync::Arc;

use thiserror::Error;

use crate::DocumentKind;
use crate::backend::PdfBackend;
use crate::ocr::OcrEngine;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no text could be extracted from the PDF file")]
    NoText,
    #[error(transparent)]
    Pdf(#[from] crate::backend::BackendError),
    #[error(transparent)]
    Ocr(#[from] crate::ocr::OcrError),
}

/// Converts an uploaded document into plain text.
///
/// PDFs go page by page through the text layer, falling back to render + OCR
/// for pages whose layer is empty; page results are concatenated in order
/// with no separator. Plain text decodes as UTF-8 with a Latin-1 retry.
///
/// Collaborators are injected so the pipeline is testable without a PDF
/// engine or an OCR binary. Each call is a pure function of its input: no
/// state is carried between calls.
#[derive(Clone)]
pub struct TextExtractor {
    pdf: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
}

impl TextExtractor {
    pub fn new(pdf: Arc<dyn PdfBackend>, ocr: Arc<dyn OcrEngine>) -> Self {
        Self { pdf, ocr }
    }

    /// Extract text from `data` according to `kind`.
    ///
    /// A failure on any PDF page aborts the whole extraction; there is no
    /// partial-result recovery. The plain-text path performs no emptiness
    /// check — that is the caller's concern.
    pub fn extract(&self, data: &[u8], kind: DocumentKind) -> Result<String, ExtractError> {
        match kind {
            DocumentKind::Pdf => self.extract_pdf(data),
            DocumentKind::Text => Ok(decode_text(data)),
        }
    }

    fn extract_pdf(&self, data: &[u8]) -> Result<String, ExtractError> {
        let document = self.pdf.open(data)?;
        let mut text = String::new();

        for index in 0..document.page_count() {
            let page_text = document.page_text(index)?;
            if page_text.trim().is_empty() {
                // No usable text layer: render the page and OCR it instead.
                let image = document.render_page(index)?;
                let ocr_text = self.ocr.recognize(image.path())?;
                tracing::debug!(page = index, chars = ocr_text.len(), "used OCR fallback");
                text.push_str(&ocr_text);
            } else {
                text.push_str(&page_text);
            }
        }

        if text.trim().is_empty() {
            return Err(ExtractError::NoText);
        }
        Ok(text)
    }
}

/// Decode bytes as UTF-8, retrying as Latin-1 on invalid sequences.
///
/// Latin-1 maps every byte to a code point, so the fallback is total and the
/// decode cannot fail.
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_owned(),
        Err(_) => encoding_rs::mem::decode_latin1(data).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::backend::{BackendError, PageImage, PdfDocument};
    use crate::ocr::OcrError;

    /// Backend whose documents have fixed per-page text layers.
    struct FakePdf {
        pages: Vec<String>,
    }

    impl FakePdf {
        fn new(pages: &[&str]) -> Self {
            Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
            }
        }
    }

    impl PdfBackend for FakePdf {
        fn open(&self, _data: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
            Ok(Box::new(FakeDocument {
                pages: self.pages.clone(),
            }))
        }
    }

    struct FakeDocument {
        pages: Vec<String>,
    }

    impl PdfDocument for FakeDocument {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn page_text(&self, index: usize) -> Result<String, BackendError> {
            Ok(self.pages[index].clone())
        }

        fn render_page(&self, index: usize) -> Result<PageImage, BackendError> {
            let dir = tempfile::tempdir()?;
            let path = dir.path().join(format!("page-{index}.png"));
            std::fs::write(&path, b"fake png")?;
            Ok(PageImage::new(dir, path))
        }
    }

    /// OCR engine that returns a fixed string and counts invocations.
    struct FakeOcr {
        text: String,
        calls: AtomicUsize,
    }

    impl FakeOcr {
        fn new(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl OcrEngine for FakeOcr {
        fn recognize(&self, _image: &Path) -> Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image: &Path) -> Result<String, OcrError> {
            Err(OcrError::Failed("boom".into()))
        }
    }

    fn extractor(pages: &[&str], ocr: Arc<FakeOcr>) -> TextExtractor {
        TextExtractor::new(Arc::new(FakePdf::new(pages)), ocr)
    }

    #[test]
    fn test_utf8_text_returned_verbatim() {
        let ocr = FakeOcr::new("");
        let pipeline = extractor(&[], ocr);
        let text = pipeline
            .extract("Jane Doe, Rust engineer".as_bytes(), DocumentKind::Text)
            .unwrap();
        assert_eq!(text, "Jane Doe, Rust engineer");
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_latin1() {
        let ocr = FakeOcr::new("");
        let pipeline = extractor(&[], ocr);
        // "café" encoded as Latin-1: 0xE9 is invalid UTF-8.
        let text = pipeline
            .extract(b"caf\xe9", DocumentKind::Text)
            .unwrap();
        assert_eq!(text, "café");
    }

    #[test]
    fn test_empty_text_file_is_not_an_error() {
        let ocr = FakeOcr::new("");
        let pipeline = extractor(&[], ocr);
        let text = pipeline.extract(b"", DocumentKind::Text).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn test_pdf_with_text_layers_never_invokes_ocr() {
        let ocr = FakeOcr::new("should not appear");
        let pipeline = extractor(&["First page. ", "Second page."], ocr.clone());
        let text = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        assert_eq!(text, "First page. Second page.");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_page_substituted_with_ocr_in_position() {
        let ocr = FakeOcr::new("[scanned]");
        let pipeline = extractor(&["before", "", "after"], ocr.clone());
        let text = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        assert_eq!(text, "before[scanned]after");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_whitespace_only_page_triggers_ocr() {
        let ocr = FakeOcr::new("recovered");
        let pipeline = extractor(&[" \n\t"], ocr.clone());
        let text = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        assert_eq!(text, "recovered");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pdf_with_no_text_anywhere_fails() {
        let ocr = FakeOcr::new("  ");
        let pipeline = extractor(&["", "\n"], ocr);
        let err = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::NoText));
    }

    #[test]
    fn test_ocr_failure_aborts_extraction() {
        let pipeline = TextExtractor::new(
            Arc::new(FakePdf::new(&["text", ""])),
            Arc::new(FailingOcr),
        );
        let err = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let ocr = FakeOcr::new("ocr page");
        let pipeline = extractor(&["layer", ""], ocr);
        let first = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        let second = pipeline.extract(b"%PDF-", DocumentKind::Pdf).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_latin1_decode_is_total() {
        // Every possible byte decodes; no input can make the text path fail.
        let all_bytes: Vec<u8> = (0u8..=255).collect();
        let text = decode_text(&all_bytes);
        assert_eq!(text.chars().count(), 256);
    }
}
