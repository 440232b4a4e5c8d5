use std::path::Path;

use lopdf::Document;

use super::{read_file, ContentExtractor, ExtractedContent};
use crate::{
    errors::{AppError, AppResult},
    models::domain::ExtractionMetadata,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl ContentExtractor for PdfExtractor {
    fn extract(&self, path: &Path) -> AppResult<ExtractedContent> {
        let bytes = read_file(path)?;
        let document = Document::load_mem(&bytes)
            .map_err(|e| AppError::ExtractionError(format!("Failed to parse PDF: {}", e)))?;

        let pages = document.get_pages();
        let mut page_texts = Vec::with_capacity(pages.len());

        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) if !text.trim().is_empty() => page_texts.push(text.trim().to_string()),
                Ok(_) => {}
                Err(e) => {
                    // Scanned pages and exotic fonts fail here; keep the rest.
                    log::warn!(
                        "Failed to extract text from page {} of {}: {}",
                        page_number,
                        path.display(),
                        e
                    );
                }
            }
        }

        Ok(ExtractedContent {
            text: page_texts.join("\n\n"),
            metadata: ExtractionMetadata {
                file_size: bytes.len() as u64,
                page_count: Some(pages.len()),
                ..Default::default()
            },
        })
    }
}
