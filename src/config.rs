use std::{env, path::PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::errors::{AppError, AppResult};

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_KEY_PREFIX: &str = "sk-or-v1-";

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub openai_api_base: Option<String>,
    pub model_name: String,
    pub upload_dir: PathBuf,
    pub materials_index: PathBuf,
    pub max_file_size_mb: u64,
    pub tesseract_path: String,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_default();
        let is_openrouter = api_key.starts_with(OPENROUTER_KEY_PREFIX);

        let upload_dir =
            PathBuf::from(env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string()));
        let materials_index = env::var("MATERIALS_INDEX")
            .map(PathBuf::from)
            .unwrap_or_else(|_| upload_dir.join("materials.json"));

        Self {
            openai_api_base: env::var("OPENAI_API_BASE")
                .ok()
                .filter(|base| !base.trim().is_empty())
                .or_else(|| is_openrouter.then(|| OPENROUTER_API_BASE.to_string())),
            model_name: env::var("MODEL_NAME").unwrap_or_else(|_| {
                if is_openrouter {
                    "openai/gpt-4o-mini".to_string()
                } else {
                    "gpt-4o-mini".to_string()
                }
            }),
            openai_api_key: SecretString::from(api_key),
            upload_dir,
            materials_index,
            max_file_size_mb: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|size| size.parse().ok())
                .unwrap_or(10),
            tesseract_path: env::var("TESSERACT_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty())
                .unwrap_or_else(|| "tesseract".to_string()),
            web_server_host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            web_server_port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Checks the settings the server cannot run without.
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "OPENAI_API_KEY is not set. Export it or add it to .env".to_string(),
            ));
        }

        if self.max_file_size_mb == 0 {
            return Err(AppError::ValidationError(
                "MAX_FILE_SIZE must be at least 1 (megabytes)".to_string(),
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("sk-test-key".to_string()),
            openai_api_base: None,
            model_name: "gpt-4o-mini".to_string(),
            upload_dir: PathBuf::from("test-uploads"),
            materials_index: PathBuf::from("test-uploads/materials.json"),
            max_file_size_mb: 1,
            tesseract_path: "tesseract".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
        }
    }
}
