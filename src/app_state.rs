use std::sync::Arc;

use crate::{
    config::Config,
    errors::AppResult,
    repositories::{JsonMaterialRepository, MaterialRepository},
    services::{
        extractors::DocumentExtractor,
        material_service::MaterialService,
        model_service::{CompletionGateway, OpenAiGateway},
        tutor_service::TutorService,
    },
    storage::FileStore,
};

#[derive(Clone)]
pub struct AppState {
    pub material_service: Arc<MaterialService>,
    pub tutor_service: Arc<TutorService>,
    pub store: FileStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let store = FileStore::open(&config).await?;

        let repository = Arc::new(JsonMaterialRepository::open(&config.materials_index).await?);
        let gateway = Arc::new(OpenAiGateway::new(&config));
        log::info!("Using model {}", gateway.model_name());

        Ok(Self::with_components(config, store, repository, gateway))
    }

    /// Wires the services from already-built parts; tests inject an
    /// in-memory repository and a stub gateway here.
    pub fn with_components(
        config: Config,
        store: FileStore,
        repository: Arc<dyn MaterialRepository>,
        gateway: Arc<dyn CompletionGateway>,
    ) -> Self {
        let material_service = Arc::new(MaterialService::new(
            repository.clone(),
            store.clone(),
            DocumentExtractor::new(config.tesseract_path.clone()),
            config.max_file_size_bytes(),
        ));
        let tutor_service = Arc::new(TutorService::new(repository, gateway));

        Self {
            material_service,
            tutor_service,
            store,
            config: Arc::new(config),
        }
    }
}
