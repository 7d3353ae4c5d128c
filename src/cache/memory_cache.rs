//! Cache en memoria con semántica de listas de Redis
//!
//! Reproduce LRANGE / RPUSH / EXPIRE dentro del proceso: listas ordenadas
//! por clave con una expiración absoluta opcional. Sirve para desarrollo
//! local sin Redis y para los tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::ListCache;
use crate::utils::errors::AppResult;

/// Lista cacheada con su expiración
#[derive(Debug, Clone)]
struct CachedList {
    values: Vec<String>,
    /// `None` equivale a una clave sin TTL (persistente)
    expires_at: Option<Instant>,
}

impl CachedList {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }
}

#[derive(Default)]
pub struct InMemoryListCache {
    entries: RwLock<HashMap<String, CachedList>>,
}

impl InMemoryListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiempo restante antes de expirar. `None` si la clave no existe,
    /// ya expiró o no tiene TTL.
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        let now = Instant::now();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at.saturating_duration_since(now))
    }

    /// Verificar si la clave existe y no ha expirado
    pub async fn exists(&self, key: &str) -> bool {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(Instant::now()))
    }

    /// Simular una expulsión del backend
    pub async fn evict(&self, key: &str) {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            debug!("🗑️ Clave expulsada del cache en memoria: {}", key);
        }
    }
}

#[async_trait]
impl ListCache for InMemoryListCache {
    async fn list_read(&self, key: &str) -> AppResult<Vec<String>> {
        let mut entries = self.entries.write().await;

        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.is_expired(Instant::now()));
        if expired {
            entries.remove(key);
            debug!("Cache miss (expired) para clave: {}", key);
            return Ok(Vec::new());
        }

        match entries.get(key) {
            Some(entry) => {
                debug!("Cache hit para clave: {} ({} elementos)", key, entry.values.len());
                Ok(entry.values.clone())
            }
            None => {
                debug!("Cache miss para clave: {}", key);
                Ok(Vec::new())
            }
        }
    }

    async fn list_append_many(&self, key: &str, values: &[String]) -> AppResult<()> {
        if values.is_empty() {
            return Ok(());
        }

        let mut entries = self.entries.write().await;
        let now = Instant::now();

        // Una clave expirada se comporta como inexistente: la lista nueva nace sin TTL
        let entry = entries
            .entry(key.to_string())
            .and_modify(|entry| {
                if entry.is_expired(now) {
                    *entry = CachedList { values: Vec::new(), expires_at: None };
                }
            })
            .or_insert_with(|| CachedList { values: Vec::new(), expires_at: None });

        entry.values.extend_from_slice(values);
        debug!("Lista {} ahora con {} elementos", key, entry.values.len());
        Ok(())
    }

    async fn set_expiry(&self, key: &str, ttl: Duration) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();

        if let Some(entry) = entries.get_mut(key).filter(|entry| !entry.is_expired(now)) {
            entry.expires_at = Some(now + ttl);
            debug!("TTL de {}s fijado para clave: {}", ttl.as_secs(), key);
        }
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }
}
