use std::path::Path;
use std::process::Command;

use entract_core::{OcrEngine, OcrError};

/// Tesseract OCR engine invoked as a subprocess.
///
/// Runs `tesseract <image> stdout -l <lang>` on a rendered page image and
/// returns stdout as-is, with no confidence filtering.
pub struct TesseractOcr {
    /// Tesseract language setting.
    language: String,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Tesseract language code (default `eng`).
    pub fn with_language(mut self, lang: &str) -> Self {
        self.language = lang.to_string();
        self
    }

    /// Whether the tesseract binary is on PATH. Used for startup logging;
    /// recognition errors surface through [`OcrError`] regardless.
    pub fn is_available() -> bool {
        Command::new("tesseract").arg("--version").output().is_ok()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image)
            .arg("stdout")
            .args(["-l", &self.language])
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::Failed(format!("tesseract failed: {}", stderr)))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::NotAvailable(
                "tesseract not found (install tesseract-ocr)".to_string(),
            )),
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}
