use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Material {
    pub id: String,          // Generated on upload, never reused
    pub file_name: String,   // Name supplied by the client
    pub format: MaterialFormat,
    pub text: String,        // Extracted text, never empty
    pub content_length: usize, // Character count of `text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub file_size: u64,
    pub stored_path: PathBuf,
    pub metadata: ExtractionMetadata,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize, Copy)]
#[serde(rename_all = "lowercase")]
pub enum MaterialFormat {
    Pdf,
    Docx,
    Pptx,
    Image,
}

/// Facts the extractor learned about the document besides its text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractionMetadata {
    pub file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slide_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_count: Option<usize>,
}

pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "docx", "pptx", "jpg", "jpeg", "png", "bmp", "tiff", "tif", "gif",
];

impl MaterialFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Some(MaterialFormat::Pdf),
            "docx" => Some(MaterialFormat::Docx),
            "pptx" => Some(MaterialFormat::Pptx),
            "jpg" | "jpeg" | "png" | "bmp" | "tiff" | "tif" | "gif" => Some(MaterialFormat::Image),
            _ => None,
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        file_extension(file_name).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialFormat::Pdf => "pdf",
            MaterialFormat::Docx => "docx",
            MaterialFormat::Pptx => "pptx",
            MaterialFormat::Image => "image",
        }
    }
}

impl std::fmt::Display for MaterialFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased extension without the dot.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

impl Material {
    pub fn new(
        file_name: &str,
        format: MaterialFormat,
        text: String,
        subject: Option<String>,
        stored_path: PathBuf,
        metadata: ExtractionMetadata,
    ) -> Self {
        Self::with_id(
            &Uuid::new_v4().to_string(),
            file_name,
            format,
            text,
            subject,
            stored_path,
            metadata,
        )
    }

    pub fn with_id(
        id: &str,
        file_name: &str,
        format: MaterialFormat,
        text: String,
        subject: Option<String>,
        stored_path: PathBuf,
        metadata: ExtractionMetadata,
    ) -> Self {
        Material {
            id: id.to_string(),
            file_name: file_name.to_string(),
            format,
            content_length: text.chars().count(),
            text,
            subject: subject.filter(|s| !s.trim().is_empty()),
            file_size: metadata.file_size,
            stored_path,
            metadata,
            created_at: Utc::now(),
        }
    }
}
