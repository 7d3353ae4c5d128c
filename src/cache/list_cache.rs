//! Contrato del backend de cache consumido por el servicio de categorías.

use async_trait::async_trait;
use std::time::Duration;

use crate::utils::errors::AppResult;

/// Operaciones de lista ordenada por clave con TTL.
///
/// Cualquier fallo de conectividad se reporta como
/// [`AppError::StorageUnavailable`](crate::utils::errors::AppError::StorageUnavailable).
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Lista completa de la clave. Vacía si no existe o ya expiró.
    async fn list_read(&self, key: &str) -> AppResult<Vec<String>>;

    /// Agrega valores al final de la lista. Crea la clave si no existe
    /// y nunca modifica su expiración.
    async fn list_append_many(&self, key: &str, values: &[String]) -> AppResult<()>;

    /// Fija la expiración absoluta de la clave a `ttl` desde ahora.
    /// No hace nada si la clave no existe.
    async fn set_expiry(&self, key: &str, ttl: Duration) -> AppResult<()>;

    /// Verificar si el backend responde
    async fn is_connected(&self) -> bool;
}
