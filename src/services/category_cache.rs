//! Cache de categorías (read-through / write-through)
//!
//! Sirve la lista de etiquetas de artículos desde el cache y usa el
//! repositorio como fuente de verdad.
//!
//! - Lectura: en un miss se lee el repositorio, se empuja la lista completa
//!   al cache y se fija el TTL. Un resultado vacío nunca se cachea.
//! - Escritura: se verifica el duplicado en cache y en repositorio, se
//!   escribe primero en el repositorio y después se agrega al final de la
//!   lista cacheada sin tocar su TTL.
//!
//! Limitaciones conocidas:
//! - Dos creaciones concurrentes de la misma etiqueta pueden pasar ambas
//!   verificaciones; la restricción UNIQUE del repositorio decide y la
//!   segunda recibe `Conflict`.
//! - Si la clave expiró entre la verificación y el append, el append crea una
//!   lista sin TTL que no expira hasta que otro camino fije uno.
//! - Dos lecturas en frío concurrentes pueden fallar ambas en el cache y
//!   empujar cada una la lista completa: la entrada queda con cada etiqueta
//!   repetida hasta que expire.
//! - Si el RPUSH de la repoblación funciona pero el EXPIRE falla, la lista
//!   queda sin TTL y no se vuelve a repoblar sola.
//! - Las escrituras al repositorio hechas fuera de este servicio no se ven
//!   hasta que expire la entrada (máximo un TTL).

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::{CacheConfig, ListCache};
use crate::repositories::LabelRepository;
use crate::utils::errors::{conflict_error, AppError, AppResult};

/// Origen de una lectura de categorías
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategorySource {
    Cache,
    Database,
}

#[derive(Clone)]
pub struct CategoryCache {
    cache: Arc<dyn ListCache>,
    repository: Arc<dyn LabelRepository>,
    key: String,
    ttl: Duration,
}

impl CategoryCache {
    pub fn new(
        cache: Arc<dyn ListCache>,
        repository: Arc<dyn LabelRepository>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            cache,
            repository,
            key: config.category_key.clone(),
            ttl: config.category_ttl(),
        }
    }

    /// Lista de categorías, desde el cache si está poblado.
    pub async fn get_categories(&self) -> AppResult<Vec<String>> {
        let (labels, _) = self.get_categories_with_source().await?;
        Ok(labels)
    }

    /// Igual que [`get_categories`](Self::get_categories) pero indica si la
    /// lista salió del cache o de la base de datos.
    pub async fn get_categories_with_source(&self) -> AppResult<(Vec<String>, CategorySource)> {
        let cached = self.cache.list_read(&self.key).await?;
        if !cached.is_empty() {
            debug!("📥 {} categorías servidas desde cache", cached.len());
            return Ok((cached, CategorySource::Cache));
        }

        let labels = self.repository.list_all_labels().await?;
        if labels.is_empty() {
            // No se cachea el vacío: la próxima lectura vuelve a consultar la base
            return Err(AppError::NotFound("No labels found".to_string()));
        }

        self.cache.list_append_many(&self.key, &labels).await?;
        self.cache.set_expiry(&self.key, self.ttl).await?;

        info!(
            "💾 Cache de categorías poblado con {} etiquetas (TTL: {}s)",
            labels.len(),
            self.ttl.as_secs()
        );
        Ok((labels, CategorySource::Database))
    }

    /// Crear una etiqueta nueva en el repositorio y reflejarla en el cache.
    pub async fn create_label(&self, label: &str) -> AppResult<()> {
        if label.trim().is_empty() {
            return Err(AppError::ValidationError("Miss Label Name".to_string()));
        }

        let cached = self.cache.list_read(&self.key).await?;
        if cached.iter().any(|existing| existing == label) {
            debug!("Etiqueta '{}' ya presente en cache", label);
            return Err(conflict_error("Label", "name", label));
        }

        if self.repository.find_label(label).await? {
            debug!("Etiqueta '{}' ya presente en base de datos", label);
            return Err(conflict_error("Label", "name", label));
        }

        self.repository.insert_label(label).await?;

        // El repositorio ya tiene la etiqueta: si el append falla, la próxima
        // repoblación tras expirar la recupera.
        let appended = [label.to_string()];
        if let Err(e) = self.cache.list_append_many(&self.key, &appended).await {
            warn!("⚠️ Etiqueta '{}' guardada pero no agregada al cache: {}", label, e);
            return Err(e);
        }

        info!("✅ Etiqueta '{}' creada", label);
        Ok(())
    }

    /// Estado de conectividad de ambos backends
    pub async fn backend_status(&self) -> BackendStatus {
        let (cache, database) = tokio::join!(self.cache.is_connected(), self.repository.is_connected());
        BackendStatus { cache, database }
    }
}

/// Resultado del chequeo de salud de los backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BackendStatus {
    pub cache: bool,
    pub database: bool,
}

impl BackendStatus {
    pub fn is_healthy(&self) -> bool {
        self.cache && self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryListCache;
    use crate::repositories::InMemoryLabelRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KEY: &str = "article_labels";

    /// Cache que falla en todas las operaciones
    struct UnreachableCache;

    #[async_trait]
    impl ListCache for UnreachableCache {
        async fn list_read(&self, _key: &str) -> AppResult<Vec<String>> {
            Err(AppError::StorageUnavailable("redis down".into()))
        }
        async fn list_append_many(&self, _key: &str, _values: &[String]) -> AppResult<()> {
            Err(AppError::StorageUnavailable("redis down".into()))
        }
        async fn set_expiry(&self, _key: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::StorageUnavailable("redis down".into()))
        }
        async fn is_connected(&self) -> bool {
            false
        }
    }

    /// Repositorio que lee bien pero falla al insertar, o falla en todo
    struct BrokenRepository {
        reads_fail: bool,
    }

    #[async_trait]
    impl LabelRepository for BrokenRepository {
        async fn list_all_labels(&self) -> AppResult<Vec<String>> {
            if self.reads_fail {
                Err(AppError::StorageUnavailable("db down".into()))
            } else {
                Ok(Vec::new())
            }
        }
        async fn find_label(&self, _label: &str) -> AppResult<bool> {
            if self.reads_fail {
                Err(AppError::StorageUnavailable("db down".into()))
            } else {
                Ok(false)
            }
        }
        async fn insert_label(&self, _label: &str) -> AppResult<()> {
            Err(AppError::StorageUnavailable("db down".into()))
        }
        async fn is_connected(&self) -> bool {
            false
        }
    }

    /// Envoltorio que cuenta las llamadas al cache
    #[derive(Default)]
    struct CountingCache {
        inner: InMemoryListCache,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListCache for CountingCache {
        async fn list_read(&self, key: &str) -> AppResult<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_read(key).await
        }
        async fn list_append_many(&self, key: &str, values: &[String]) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.list_append_many(key, values).await
        }
        async fn set_expiry(&self, key: &str, ttl: Duration) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.set_expiry(key, ttl).await
        }
        async fn is_connected(&self) -> bool {
            true
        }
    }

    fn service(
        cache: Arc<dyn ListCache>,
        repository: Arc<dyn LabelRepository>,
    ) -> CategoryCache {
        CategoryCache::new(cache, repository, &CacheConfig::default())
    }

    #[tokio::test]
    async fn test_cold_read_populates_cache_with_ttl() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A", "B"]));
        let categories = service(cache.clone(), repo);

        let (labels, source) = categories.get_categories_with_source().await.unwrap();

        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(source, CategorySource::Database);
        assert_eq!(cache.list_read(KEY).await.unwrap(), vec!["A", "B"]);
        assert!(cache.ttl(KEY).await.is_some_and(|ttl| ttl <= Duration::from_secs(3600)));
    }

    #[tokio::test]
    async fn test_repeated_reads_are_identical() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["rust", "go", "zig"]));
        let categories = service(cache, repo);

        let first = categories.get_categories().await.unwrap();
        let (second, source) = categories.get_categories_with_source().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source, CategorySource::Cache);
    }

    #[tokio::test]
    async fn test_external_repository_write_is_not_visible_within_ttl() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A", "B"]));
        let categories = service(cache, repo.clone());

        assert_eq!(categories.get_categories().await.unwrap(), vec!["A", "B"]);
        repo.insert_label("C").await.unwrap();

        assert_eq!(categories.get_categories().await.unwrap(), vec!["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_triggers_repopulation() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let categories = service(cache, repo.clone());

        categories.get_categories().await.unwrap();
        repo.insert_label("B").await.unwrap();

        tokio::time::advance(Duration::from_secs(3600)).await;

        let (labels, source) = categories.get_categories_with_source().await.unwrap();
        assert_eq!(labels, vec!["A", "B"]);
        assert_eq!(source, CategorySource::Database);
    }

    #[tokio::test]
    async fn test_empty_repository_is_not_found_and_not_cached() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::new());
        let categories = service(cache.clone(), repo);

        let err = categories.get_categories().await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(!cache.exists(KEY).await);
    }

    #[tokio::test]
    async fn test_create_on_empty_system_then_read() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::new());
        let categories = service(cache, repo.clone());

        categories.create_label("X").await.unwrap();

        assert!(repo.find_label("X").await.unwrap());
        assert!(categories.get_categories().await.unwrap().contains(&"X".to_string()));
    }

    #[tokio::test]
    async fn test_duplicate_create_is_conflict() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::new());
        let categories = service(cache, repo.clone());

        categories.create_label("X").await.unwrap();
        let err = categories.create_label("X").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(repo.list_all_labels().await.unwrap(), vec!["X"]);
    }

    #[tokio::test]
    async fn test_duplicate_only_in_repository_is_conflict() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["X"]));
        let categories = service(cache.clone(), repo);

        let err = categories.create_label("X").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(!cache.exists(KEY).await);
    }

    #[tokio::test]
    async fn test_duplicate_only_in_cache_is_conflict() {
        let cache = Arc::new(InMemoryListCache::new());
        cache.list_append_many(KEY, &["X".to_string()]).await.unwrap();
        let repo = Arc::new(InMemoryLabelRepository::new());
        let categories = service(cache, repo.clone());

        let err = categories.create_label("X").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(!repo.find_label("X").await.unwrap());
    }

    #[tokio::test]
    async fn test_match_is_case_sensitive() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["Rust"]));
        let categories = service(cache, repo);

        categories.get_categories().await.unwrap();
        categories.create_label("rust").await.unwrap();

        assert_eq!(categories.get_categories().await.unwrap(), vec!["Rust", "rust"]);
    }

    #[tokio::test]
    async fn test_blank_label_touches_no_backend() {
        let cache = Arc::new(CountingCache::default());
        let categories = service(cache.clone(), Arc::new(BrokenRepository { reads_fail: true }));

        for label in ["", "   ", "\t\n"] {
            let err = categories.create_label(label).await.unwrap_err();
            assert!(matches!(err, AppError::ValidationError(_)));
        }
        assert_eq!(cache.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_append_keeps_original_ttl() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let categories = service(cache.clone(), repo);

        categories.get_categories().await.unwrap();
        tokio::time::advance(Duration::from_secs(1800)).await;
        categories.create_label("B").await.unwrap();

        assert_eq!(cache.ttl(KEY).await, Some(Duration::from_secs(1800)));
    }

    #[tokio::test]
    async fn test_create_after_eviction_leaves_list_without_ttl() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let categories = service(cache.clone(), repo);

        categories.get_categories().await.unwrap();
        cache.evict(KEY).await;
        categories.create_label("B").await.unwrap();

        // Inconsistencia conocida: la lista recreada solo tiene "B" y no expira
        assert_eq!(categories.get_categories().await.unwrap(), vec!["B"]);
        assert_eq!(cache.ttl(KEY).await, None);
    }

    #[tokio::test]
    async fn test_unreachable_cache_is_storage_unavailable() {
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let categories = service(Arc::new(UnreachableCache), repo.clone());

        assert!(matches!(
            categories.get_categories().await.unwrap_err(),
            AppError::StorageUnavailable(_)
        ));
        assert!(matches!(
            categories.create_label("B").await.unwrap_err(),
            AppError::StorageUnavailable(_)
        ));
        assert_eq!(repo.list_all_labels().await.unwrap(), vec!["A"]);
    }

    #[tokio::test]
    async fn test_unreachable_repository_is_storage_unavailable() {
        let cache = Arc::new(InMemoryListCache::new());
        let categories = service(cache.clone(), Arc::new(BrokenRepository { reads_fail: true }));

        assert!(matches!(
            categories.get_categories().await.unwrap_err(),
            AppError::StorageUnavailable(_)
        ));
        assert!(matches!(
            categories.create_label("B").await.unwrap_err(),
            AppError::StorageUnavailable(_)
        ));
        assert!(!cache.exists(KEY).await);
    }

    #[tokio::test]
    async fn test_failed_insert_skips_cache_append() {
        let cache = Arc::new(CountingCache::default());
        let categories = service(cache.clone(), Arc::new(BrokenRepository { reads_fail: false }));

        let err = categories.create_label("B").await.unwrap_err();

        assert!(matches!(err, AppError::StorageUnavailable(_)));
        // Solo la lectura de verificación
        assert_eq!(cache.calls.load(Ordering::SeqCst), 1);
        assert!(!cache.inner.exists(KEY).await);
    }

    #[tokio::test]
    async fn test_backend_status() {
        let healthy = service(
            Arc::new(InMemoryListCache::new()),
            Arc::new(InMemoryLabelRepository::new()),
        );
        assert!(healthy.backend_status().await.is_healthy());

        let degraded = service(Arc::new(UnreachableCache), Arc::new(InMemoryLabelRepository::new()));
        let status = degraded.backend_status().await;
        assert!(!status.cache);
        assert!(status.database);
        assert!(!status.is_healthy());
    }

    /// Repositorio que retiene las lecturas hasta que llegan dos a la vez
    struct RendezvousRepository {
        inner: InMemoryLabelRepository,
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl LabelRepository for RendezvousRepository {
        async fn list_all_labels(&self) -> AppResult<Vec<String>> {
            self.barrier.wait().await;
            self.inner.list_all_labels().await
        }
        async fn find_label(&self, label: &str) -> AppResult<bool> {
            self.inner.find_label(label).await
        }
        async fn insert_label(&self, label: &str) -> AppResult<()> {
            self.inner.insert_label(label).await
        }
        async fn is_connected(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_concurrent_cold_reads_duplicate_cached_entries() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(RendezvousRepository {
            inner: InMemoryLabelRepository::with_labels(["A", "B"]),
            barrier: tokio::sync::Barrier::new(2),
        });
        let categories = service(cache.clone(), repo);

        let (first, second) = tokio::join!(categories.get_categories(), categories.get_categories());

        assert_eq!(first.unwrap(), vec!["A", "B"]);
        assert_eq!(second.unwrap(), vec!["A", "B"]);
        // Limitación conocida: ambas repoblaciones llegan al cache
        assert_eq!(cache.list_read(KEY).await.unwrap(), vec!["A", "B", "A", "B"]);
        assert_eq!(categories.get_categories().await.unwrap(), vec!["A", "B", "A", "B"]);
    }

    /// Cache cuyo EXPIRE falla después de un RPUSH exitoso
    #[derive(Default)]
    struct NoExpiryCache {
        inner: InMemoryListCache,
    }

    #[async_trait]
    impl ListCache for NoExpiryCache {
        async fn list_read(&self, key: &str) -> AppResult<Vec<String>> {
            self.inner.list_read(key).await
        }
        async fn list_append_many(&self, key: &str, values: &[String]) -> AppResult<()> {
            self.inner.list_append_many(key, values).await
        }
        async fn set_expiry(&self, _key: &str, _ttl: Duration) -> AppResult<()> {
            Err(AppError::StorageUnavailable("EXPIRE timed out".into()))
        }
        async fn is_connected(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_failed_expiry_leaves_list_without_ttl() {
        let cache = Arc::new(NoExpiryCache::default());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let categories = service(cache.clone(), repo);

        let err = categories.get_categories().await.unwrap_err();

        assert!(matches!(err, AppError::StorageUnavailable(_)));
        assert_eq!(cache.inner.list_read(KEY).await.unwrap(), vec!["A"]);
        assert_eq!(cache.inner.ttl(KEY).await, None);
        let (labels, source) = categories.get_categories_with_source().await.unwrap();
        assert_eq!(labels, vec!["A"]);
        assert_eq!(source, CategorySource::Cache);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_key_and_ttl() {
        let cache = Arc::new(InMemoryListCache::new());
        let repo = Arc::new(InMemoryLabelRepository::with_labels(["A"]));
        let config = CacheConfig {
            category_key: "labels:v2".to_string(),
            category_ttl: 60,
            ..CacheConfig::default()
        };
        let categories = CategoryCache::new(cache.clone(), repo, &config);

        categories.get_categories().await.unwrap();

        assert!(cache.exists("labels:v2").await);
        assert_eq!(cache.ttl("labels:v2").await, Some(Duration::from_secs(60)));
        assert!(!cache.exists(KEY).await);
    }
}
