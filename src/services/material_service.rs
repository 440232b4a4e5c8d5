use std::sync::Arc;

use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        material::{file_extension, SUPPORTED_EXTENSIONS},
        Material, MaterialFormat,
    },
    models::dto::response::MaterialDetailResponse,
    repositories::MaterialRepository,
    services::extractors::DocumentExtractor,
    storage::FileStore,
};

pub struct MaterialService {
    repository: Arc<dyn MaterialRepository>,
    store: FileStore,
    extractor: DocumentExtractor,
    max_file_size_bytes: u64,
}

impl MaterialService {
    pub fn new(
        repository: Arc<dyn MaterialRepository>,
        store: FileStore,
        extractor: DocumentExtractor,
        max_file_size_bytes: u64,
    ) -> Self {
        Self {
            repository,
            store,
            extractor,
            max_file_size_bytes,
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    /// Stores the upload, extracts its text and registers it. Nothing is
    /// registered and the stored file is removed if any step fails.
    pub async fn upload(
        &self,
        file_name: &str,
        bytes: &[u8],
        subject: Option<String>,
    ) -> AppResult<Material> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::ValidationError("No file selected".to_string()));
        }

        let (extension, format) = Self::detect_format(file_name)?;
        self.check_size(bytes.len() as u64)?;
        if bytes.is_empty() {
            return Err(AppError::ValidationError(format!(
                "File '{}' is empty",
                file_name
            )));
        }

        let id = Uuid::new_v4().to_string();
        let stored_path = self.store.save(&id, &extension, bytes).await?;

        let content = match self
            .extractor
            .extract_off_thread(format, stored_path.clone())
            .await
        {
            Ok(content) => content,
            Err(err) => {
                log::warn!("Extraction failed for '{}': {}", file_name, err);
                self.discard(&stored_path).await;
                return Err(err);
            }
        };

        let material = Material::with_id(
            &id,
            file_name,
            format,
            content.text,
            subject,
            stored_path.clone(),
            content.metadata,
        );

        match self.repository.insert(material).await {
            Ok(material) => {
                log::info!(
                    "Stored material {} ({}, {} chars)",
                    material.id,
                    material.format,
                    material.content_length
                );
                Ok(material)
            }
            Err(err) => {
                self.discard(&stored_path).await;
                Err(err)
            }
        }
    }

    pub async fn list(&self) -> AppResult<Vec<Material>> {
        self.repository.list().await
    }

    pub async fn get(&self, id: &str) -> AppResult<Material> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material '{}' not found", id)))
    }

    /// Everything known about a material except its text.
    pub async fn get_summary(&self, id: &str) -> AppResult<MaterialDetailResponse> {
        self.get(id).await.map(MaterialDetailResponse::from)
    }

    /// Removes the stored file, then the record. A file that cannot be removed
    /// leaves the record in place so the delete can be retried.
    pub async fn delete(&self, id: &str) -> AppResult<Material> {
        let material = self.get(id).await?;

        self.store.remove(&material.stored_path).await?;

        let material = self
            .repository
            .delete(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material '{}' not found", id)))?;
        log::info!("Deleted material {} ({})", material.id, material.file_name);

        Ok(material)
    }

    /// Extensions with a leading dot, in display order.
    pub fn supported_formats(&self) -> Vec<String> {
        SUPPORTED_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect()
    }

    fn detect_format(file_name: &str) -> AppResult<(String, MaterialFormat)> {
        let unsupported = || {
            AppError::ExtractionError(format!(
                "Unsupported file type for '{}'. Supported: {}",
                file_name,
                SUPPORTED_EXTENSIONS.join(", ")
            ))
        };

        let extension = file_extension(file_name).ok_or_else(unsupported)?;
        let format = MaterialFormat::from_extension(&extension).ok_or_else(unsupported)?;
        Ok((extension, format))
    }

    pub fn check_size(&self, size: u64) -> AppResult<()> {
        if size > self.max_file_size_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} MB upload limit",
                self.max_file_size_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }

    async fn discard(&self, path: &std::path::Path) {
        if let Err(err) = self.store.remove(path).await {
            log::error!("Failed to clean up {}: {}", path.display(), err);
        }
    }
}
