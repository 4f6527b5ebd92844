use mupdf::{Colorspace, Document, ImageFormat, Matrix, TextPageFlags};

use entract_core::{BackendError, PageImage, PdfBackend, PdfDocument};

/// PDF points per inch.
const PDF_DPI: f32 = 72.0;

/// MuPDF-based implementation of [`PdfBackend`].
///
/// This crate is the sole AGPL island — it isolates the mupdf dependency
/// (which is AGPL-3.0) so that non-PDF code paths do not transitively
/// depend on it.
///
/// Documents are parsed straight from the uploaded bytes; nothing is staged
/// to disk except the page images rendered for OCR, which live in a scoped
/// temp directory owned by the returned [`PageImage`].
pub struct MupdfBackend {
    /// Resolution used when rendering a page for OCR. Default 300 DPI.
    render_dpi: f32,
}

impl Default for MupdfBackend {
    fn default() -> Self {
        Self { render_dpi: 300.0 }
    }
}

impl MupdfBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the OCR render resolution.
    pub fn with_render_dpi(mut self, dpi: f32) -> Self {
        self.render_dpi = dpi;
        self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, data: &[u8]) -> Result<Box<dyn PdfDocument>, BackendError> {
        let document = Document::from_bytes(data, "application/pdf")
            .map_err(|e| BackendError::Open(e.to_string()))?;
        let page_count = document
            .page_count()
            .map_err(|e| BackendError::Open(e.to_string()))? as usize;

        Ok(Box::new(MupdfDocument {
            document,
            page_count,
            render_dpi: self.render_dpi,
        }))
    }
}

struct MupdfDocument {
    document: Document,
    page_count: usize,
    render_dpi: f32,
}

impl PdfDocument for MupdfDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_text(&self, index: usize) -> Result<String, BackendError> {
        let page = self
            .document
            .load_page(index as i32)
            .map_err(|e| BackendError::Extraction(e.to_string()))?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| BackendError::Extraction(e.to_string()))?;

        // Reading order: blocks top to bottom, one line per structured-text line
        let mut text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let line_text: String = line
                    .chars()
                    .map(|c| c.char().unwrap_or('\u{FFFD}'))
                    .collect();
                text.push_str(&line_text);
                text.push('\n');
            }
        }
        Ok(text)
    }

    fn render_page(&self, index: usize) -> Result<PageImage, BackendError> {
        let page = self
            .document
            .load_page(index as i32)
            .map_err(|e| BackendError::Render(e.to_string()))?;

        let scale = self.render_dpi / PDF_DPI;
        let matrix = Matrix::new_scale(scale, scale);
        let pixmap = page
            .to_pixmap(&matrix, &Colorspace::device_rgb(), 0.0, false)
            .map_err(|e| BackendError::Render(e.to_string()))?;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join(format!("page-{}.png", index + 1));
        let path_str = path
            .to_str()
            .ok_or_else(|| BackendError::Render("invalid temp path encoding".into()))?;
        pixmap
            .save_as(path_str, ImageFormat::PNG)
            .map_err(|e| BackendError::Render(e.to_string()))?;

        Ok(PageImage::new(dir, path))
    }
}
