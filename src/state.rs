//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, y el cableado de los backends.

use std::sync::Arc;
use tracing::info;

use crate::cache::{CacheBackendKind, CacheConfig, InMemoryListCache, ListCache, RedisClient};
use crate::config::{DatabaseConfig, EnvironmentConfig, StorageBackendKind};
use crate::database::{create_pool, run_migrations};
use crate::repositories::{InMemoryLabelRepository, LabelRepository, PgLabelRepository};
use crate::services::CategoryCache;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub categories: CategoryCache,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, categories: CategoryCache) -> Self {
        Self { config, categories }
    }

    /// Conectar los backends elegidos por configuración y armar el estado
    pub async fn connect(config: EnvironmentConfig, cache_config: &CacheConfig) -> AppResult<Self> {
        let repository: Arc<dyn LabelRepository> = match config.storage_backend {
            StorageBackendKind::Postgres => {
                let pool = create_pool(&DatabaseConfig::from_env()?).await?;
                run_migrations(&pool).await?;
                Arc::new(PgLabelRepository::new(pool))
            }
            StorageBackendKind::Memory => {
                info!("🧪 Usando repositorio de etiquetas en memoria");
                Arc::new(InMemoryLabelRepository::new())
            }
        };

        let cache: Arc<dyn ListCache> = match cache_config.backend {
            CacheBackendKind::Redis => Arc::new(RedisClient::new(cache_config).await?),
            CacheBackendKind::Memory => {
                info!("🧪 Usando cache en memoria");
                Arc::new(InMemoryListCache::new())
            }
        };

        let categories = CategoryCache::new(cache, repository, cache_config);
        Ok(Self::new(config, categories))
    }
}
