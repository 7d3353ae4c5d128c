//! Cache
//!
//! Este módulo contiene los backends de cache con semántica de listas
//! ordenadas por clave y expiración absoluta.

pub mod cache_config;
pub mod list_cache;
pub mod memory_cache;
pub mod redis_client;

pub use cache_config::{CacheBackendKind, CacheConfig};
pub use list_cache::ListCache;
pub use memory_cache::InMemoryListCache;
pub use redis_client::RedisClient;
