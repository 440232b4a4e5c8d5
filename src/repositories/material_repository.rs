use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};

use crate::{
    errors::{AppError, AppResult},
    models::domain::Material,
};

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn insert(&self, material: Material) -> AppResult<Material>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Material>>;
    async fn list(&self) -> AppResult<Vec<Material>>;
    /// Removes and returns the record, `None` when the id is unknown.
    async fn delete(&self, id: &str) -> AppResult<Option<Material>>;
}

/// Materials held in memory, optionally mirrored to a JSON index file so
/// they survive restarts.
pub struct JsonMaterialRepository {
    materials: Arc<RwLock<HashMap<String, Material>>>,
    index_path: Option<PathBuf>,
}

impl JsonMaterialRepository {
    pub fn in_memory() -> Self {
        Self {
            materials: Arc::new(RwLock::new(HashMap::new())),
            index_path: None,
        }
    }

    /// Loads the index at `index_path` if it exists, otherwise starts empty.
    pub async fn open(index_path: impl Into<PathBuf>) -> AppResult<Self> {
        let index_path = index_path.into();

        let materials = match fs::read(&index_path).await {
            Ok(bytes) => {
                let stored: Vec<Material> = serde_json::from_slice(&bytes)?;
                log::info!(
                    "Loaded {} materials from {}",
                    stored.len(),
                    index_path.display()
                );
                stored
                    .into_iter()
                    .map(|material| (material.id.clone(), material))
                    .collect()
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            materials: Arc::new(RwLock::new(materials)),
            index_path: Some(index_path),
        })
    }

    /// Called with the write lock held so index writes happen in commit order.
    async fn persist(&self, materials: &HashMap<String, Material>) -> AppResult<()> {
        let Some(index_path) = &self.index_path else {
            return Ok(());
        };

        write_index(index_path, &sorted(materials.values().cloned().collect())).await
    }
}

async fn write_index(index_path: &Path, materials: &[Material]) -> AppResult<()> {
    if let Some(parent) = index_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec_pretty(materials)?;
    let tmp_path = index_path.with_extension("json.tmp");
    fs::write(&tmp_path, bytes).await?;
    fs::rename(&tmp_path, index_path).await?;
    Ok(())
}

fn sorted(mut materials: Vec<Material>) -> Vec<Material> {
    materials.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    materials
}

#[async_trait]
impl MaterialRepository for JsonMaterialRepository {
    async fn insert(&self, material: Material) -> AppResult<Material> {
        if material.text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Material text cannot be empty".to_string(),
            ));
        }

        let mut materials = self.materials.write().await;
        if materials.contains_key(&material.id) {
            return Err(AppError::ValidationError(format!(
                "Material with id '{}' already exists",
                material.id
            )));
        }

        materials.insert(material.id.clone(), material.clone());
        if let Err(err) = self.persist(&materials).await {
            materials.remove(&material.id);
            return Err(err);
        }

        Ok(material)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Material>> {
        let materials = self.materials.read().await;
        Ok(materials.get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Material>> {
        let materials = self.materials.read().await;
        Ok(sorted(materials.values().cloned().collect()))
    }

    async fn delete(&self, id: &str) -> AppResult<Option<Material>> {
        let mut materials = self.materials.write().await;
        let Some(removed) = materials.remove(id) else {
            return Ok(None);
        };

        if let Err(err) = self.persist(&materials).await {
            materials.insert(removed.id.clone(), removed);
            return Err(err);
        }

        Ok(Some(removed))
    }
}
