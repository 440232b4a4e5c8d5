//! Text extraction for uploaded study material.
//!
//! Each format has its own [`ContentExtractor`]; [`DocumentExtractor`] picks
//! one by [`MaterialFormat`]. Extraction is blocking (file I/O, XML parsing,
//! an OCR subprocess), so async callers go through
//! [`DocumentExtractor::extract_off_thread`].

mod ocr;
mod office;
mod pdf;

use std::path::{Path, PathBuf};

pub use ocr::OcrExtractor;
pub use office::{DocxExtractor, PptxExtractor};
pub use pdf::PdfExtractor;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ExtractionMetadata, MaterialFormat},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    pub text: String,
    pub metadata: ExtractionMetadata,
}

pub trait ContentExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> AppResult<ExtractedContent>;
}

#[derive(Debug, Clone)]
pub struct DocumentExtractor {
    pdf: PdfExtractor,
    docx: DocxExtractor,
    pptx: PptxExtractor,
    ocr: OcrExtractor,
}

impl DocumentExtractor {
    pub fn new(tesseract_path: impl Into<String>) -> Self {
        Self {
            pdf: PdfExtractor,
            docx: DocxExtractor,
            pptx: PptxExtractor,
            ocr: OcrExtractor::new(tesseract_path),
        }
    }

    fn extractor_for(&self, format: MaterialFormat) -> &dyn ContentExtractor {
        match format {
            MaterialFormat::Pdf => &self.pdf,
            MaterialFormat::Docx => &self.docx,
            MaterialFormat::Pptx => &self.pptx,
            MaterialFormat::Image => &self.ocr,
        }
    }

    /// Extracts text and rejects documents that yield none.
    pub fn extract(&self, format: MaterialFormat, path: &Path) -> AppResult<ExtractedContent> {
        let content = self.extractor_for(format).extract(path)?;

        if content.text.trim().is_empty() {
            return Err(AppError::ExtractionError(format!(
                "No readable text found in {} file",
                format
            )));
        }

        Ok(content)
    }

    pub async fn extract_off_thread(
        &self,
        format: MaterialFormat,
        path: PathBuf,
    ) -> AppResult<ExtractedContent> {
        let extractor = self.clone();
        tokio::task::spawn_blocking(move || extractor.extract(format, &path))
            .await
            .map_err(|e| AppError::InternalError(format!("Extraction task failed: {}", e)))?
    }
}

pub(crate) fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        AppError::ExtractionError(format!("Could not read {}: {}", path.display(), e))
    })
}
