use std::path::{Path, PathBuf};

use tokio::fs;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

/// Upload directory holding the original files, named `<material id>.<ext>`.
#[derive(Clone, Debug)]
pub struct FileStore {
    upload_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub async fn open(config: &Config) -> AppResult<Self> {
        let store = Self::new(&config.upload_dir);
        store.ensure_dirs().await?;

        log::info!("Upload directory ready at {}", store.upload_dir.display());

        Ok(store)
    }

    pub async fn ensure_dirs(&self) -> AppResult<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        Ok(())
    }

    pub fn path_for(&self, material_id: &str, extension: &str) -> PathBuf {
        self.upload_dir.join(format!("{}.{}", material_id, extension))
    }

    pub async fn save(&self, material_id: &str, extension: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let path = self.path_for(material_id, extension);
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Removes a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> AppResult<()> {
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Stored file {} was already missing", path.display());
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn health_check(&self) -> AppResult<()> {
        let metadata = fs::metadata(&self.upload_dir).await?;
        if metadata.permissions().readonly() {
            return Err(AppError::StorageError(format!(
                "Upload directory {} is read-only",
                self.upload_dir.display()
            )));
        }
        Ok(())
    }
}
