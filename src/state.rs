use std::sync::Arc;

use crate::{
    config::AppConfig,
    error::AppResult,
    services::catalog_service::CatalogService,
    storage::{FileStorage, SharedStorage},
    tab::TabRegistry,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tabs: TabRegistry,
    pub catalog: CatalogService,
}

impl AppState {
    /// Local storage lives in `config.storage_path` when set, in memory otherwise.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let local = match &config.storage_path {
            Some(path) => SharedStorage::new(FileStorage::open(path)?),
            None => SharedStorage::in_memory(),
        };
        Ok(Self::with_storage(config, local))
    }

    pub fn with_storage(config: AppConfig, local: SharedStorage) -> Self {
        Self {
            tabs: TabRegistry::new(local, &config),
            catalog: CatalogService::new(&config.catalog_path),
            config: Arc::new(config),
        }
    }
}
