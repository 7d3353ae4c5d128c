use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use leeterview_backend::cache::CacheConfig;
use leeterview_backend::config::EnvironmentConfig;
use leeterview_backend::middleware::cors_for_environment;
use leeterview_backend::routes::create_app_router;
use leeterview_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env().context("invalid environment configuration")?;
    let cache_config = CacheConfig::from_env().context("invalid cache configuration")?;

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    info!("📚 Leeterview Backend - API de categorías");
    info!("================================================");
    info!(
        "🚀 Entorno: {} | cache: {:?} | clave: {} | TTL: {}s",
        config.environment, cache_config.backend, cache_config.category_key, cache_config.category_ttl
    );

    let state = AppState::connect(config.clone(), &cache_config)
        .await
        .context("failed to connect storage backends")?;

    let app = create_app_router(state, cors_for_environment(&config));

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("invalid listen address {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Estado de Redis y PostgreSQL");
    info!("   GET  /api/Article/GetCategories - Listar etiquetas");
    info!("   POST /api/Article/CreateNewLabel - Crear etiqueta");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
