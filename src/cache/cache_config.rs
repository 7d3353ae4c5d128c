//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Clave fija de la lista de categorías
pub const DEFAULT_CATEGORY_KEY: &str = "article_labels";

/// TTL de la lista de categorías en segundos
pub const DEFAULT_CATEGORY_TTL: u64 = 3600; // 1 hora

/// Backend de cache a utilizar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    Redis,
    Memory,
}

impl std::str::FromStr for CacheBackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Config(format!("unknown CACHE_BACKEND '{}'", other))),
        }
    }
}

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    pub redis_url: String,
    /// Clave bajo la que vive la lista de categorías
    pub category_key: String,
    /// TTL fijado al poblar la lista, en segundos
    pub category_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            redis_url: "redis://localhost:6379".to_string(),
            category_key: DEFAULT_CATEGORY_KEY.to_string(),
            category_ttl: DEFAULT_CATEGORY_TTL,
        }
    }
}

impl CacheConfig {
    /// Leer configuración desde variables de entorno, con los valores por defecto
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        let backend = match env::var("CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        let category_ttl = match env::var("CATEGORY_CACHE_TTL") {
            Ok(value) => parse_category_ttl(&value)?,
            Err(_) => defaults.category_ttl,
        };

        Ok(Self {
            backend,
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            category_key: env::var("CATEGORY_CACHE_KEY").unwrap_or(defaults.category_key),
            category_ttl,
        })
    }

    pub fn category_ttl(&self) -> Duration {
        Duration::from_secs(self.category_ttl)
    }
}

/// TTL en segundos. Cero se rechaza: `EXPIRE key 0` borra la lista al instante.
fn parse_category_ttl(value: &str) -> AppResult<u64> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(AppError::Config("CATEGORY_CACHE_TTL must be greater than zero".to_string())),
        Ok(ttl) => Ok(ttl),
        Err(_) => Err(AppError::Config(format!(
            "CATEGORY_CACHE_TTL must be a number, got '{}'",
            value
        ))),
    }
}
