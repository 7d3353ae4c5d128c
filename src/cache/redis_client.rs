use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CacheConfig, ListCache};
use crate::utils::errors::{AppError, AppResult};

/// Cliente Redis con connection pooling y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())
            .map_err(|e| AppError::Config(format!("invalid REDIS_URL: {}", e)))?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }
}

#[async_trait]
impl ListCache for RedisClient {
    async fn list_read(&self, key: &str) -> AppResult<Vec<String>> {
        let mut conn = self.manager.clone();

        match conn.lrange::<_, Vec<String>>(key, 0, -1).await {
            Ok(values) => {
                if values.is_empty() {
                    debug!("❌ Cache MISS para clave: {}", key);
                } else {
                    debug!("📥 Cache HIT para clave: {} ({} elementos)", key, values.len());
                }
                Ok(values)
            }
            Err(e) => {
                warn!("⚠️ Error leyendo lista para clave {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn list_append_many(&self, key: &str, values: &[String]) -> AppResult<()> {
        // RPUSH sin valores es un error de sintaxis en Redis
        if values.is_empty() {
            return Ok(());
        }

        let mut conn = self.manager.clone();

        match conn.rpush::<_, _, i64>(key, values).await {
            Ok(len) => {
                debug!("💾 Cache RPUSH para clave: {} (longitud: {})", key, len);
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ Error agregando a la lista {}: {}", key, e);
                Err(e.into())
            }
        }
    }

    async fn set_expiry(&self, key: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.manager.clone();

        let applied: i64 = redis::cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                warn!("⚠️ Error fijando TTL para clave {}: {}", key, e);
                AppError::from(e)
            })?;

        debug!("⏰ Cache EXPIRE para clave {}: {}s (aplicado: {})", key, ttl.as_secs(), applied == 1);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }
}
