use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{ExtractionMetadata, Material, MaterialFormat, QuizQuestion};

#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub material_id: String,
    pub file_name: String,
    pub format: MaterialFormat,
    pub content_length: usize,
    pub metadata: ExtractionMetadata,
    pub subject: Option<String>,
    pub message: String,
}

impl From<Material> for UploadResponse {
    fn from(material: Material) -> Self {
        UploadResponse {
            success: true,
            material_id: material.id,
            file_name: material.file_name,
            format: material.format,
            content_length: material.content_length,
            metadata: material.metadata,
            subject: material.subject,
            message: "File uploaded and processed successfully".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialSummaryDto {
    pub material_id: String,
    pub file_name: String,
    pub format: MaterialFormat,
    pub content_length: usize,
}

impl From<&Material> for MaterialSummaryDto {
    fn from(material: &Material) -> Self {
        MaterialSummaryDto {
            material_id: material.id.clone(),
            file_name: material.file_name.clone(),
            format: material.format,
            content_length: material.content_length,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialListResponse {
    pub success: bool,
    pub count: usize,
    pub materials: Vec<MaterialSummaryDto>,
}

impl MaterialListResponse {
    pub fn new(materials: &[Material]) -> Self {
        MaterialListResponse {
            success: true,
            count: materials.len(),
            materials: materials.iter().map(MaterialSummaryDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MaterialDetailResponse {
    pub success: bool,
    pub material_id: String,
    pub file_name: String,
    pub format: MaterialFormat,
    pub subject: Option<String>,
    pub metadata: ExtractionMetadata,
    pub content_length: usize,
    pub created_at: DateTime<Utc>,
}

impl From<Material> for MaterialDetailResponse {
    fn from(material: Material) -> Self {
        MaterialDetailResponse {
            success: true,
            material_id: material.id,
            file_name: material.file_name,
            format: material.format,
            subject: material.subject,
            metadata: material.metadata,
            content_length: material.content_length,
            created_at: material.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NotesMetadata {
    pub subject: Option<String>,
    pub level: &'static str,
    pub focus: &'static str,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotesResponse {
    pub success: bool,
    pub notes: String,
    pub metadata: NotesMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_context: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simplified: Option<bool>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationResponse {
    pub success: bool,
    pub explanation: String,
    pub metadata: ExplanationMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproachesMetadata {
    pub num_approaches: u8,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApproachesResponse {
    pub success: bool,
    pub approaches: String,
    pub metadata: ApproachesMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizMetadata {
    pub total_questions: usize,
    pub skipped: usize,
    pub subject: Option<String>,
    pub difficulty: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizResponse {
    pub success: bool,
    pub questions: Vec<QuizQuestion>,
    pub metadata: QuizMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteMaterialResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SupportedFormatsResponse {
    pub formats: Vec<String>,
    pub max_file_size_mb: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::fixtures::sample_material;

    #[test]
    fn test_material_list_response_counts() {
        let materials = vec![sample_material("a.pdf", "alpha"), sample_material("b.pdf", "beta")];
        let response = MaterialListResponse::new(&materials);

        assert!(response.success);
        assert_eq!(response.count, 2);
        assert_eq!(response.materials[1].file_name, "b.pdf");
    }

    #[test]
    fn test_material_summary_omits_text() {
        let material = sample_material("lecture.pdf", "secret body text");
        let json = serde_json::to_value(MaterialSummaryDto::from(&material))
            .expect("summary should serialize");

        assert_eq!(json["material_id"], material.id.as_str());
        assert_eq!(json["format"], "pdf");
        assert!(json.get("text").is_none());
    }
}
