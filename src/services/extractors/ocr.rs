use std::{path::Path, process::Command};

use super::{ContentExtractor, ExtractedContent};
use crate::{
    errors::{AppError, AppResult},
    models::domain::ExtractionMetadata,
};

/// Image OCR through the `tesseract` command line tool.
#[derive(Debug, Clone)]
pub struct OcrExtractor {
    tesseract_path: String,
}

impl OcrExtractor {
    pub fn new(tesseract_path: impl Into<String>) -> Self {
        Self {
            tesseract_path: tesseract_path.into(),
        }
    }
}

impl ContentExtractor for OcrExtractor {
    fn extract(&self, path: &Path) -> AppResult<ExtractedContent> {
        let file_size = std::fs::metadata(path)
            .map_err(|e| {
                AppError::ExtractionError(format!("Could not read {}: {}", path.display(), e))
            })?
            .len();

        let output = Command::new(&self.tesseract_path)
            .arg(path)
            .arg("stdout")
            .output()
            .map_err(|e| {
                AppError::ExtractionError(format!(
                    "Tesseract is not available at '{}': {}",
                    self.tesseract_path, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::ExtractionError(format!(
                "OCR failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(ExtractedContent {
            text: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            metadata: ExtractionMetadata {
                file_size,
                ..Default::default()
            },
        })
    }
}
