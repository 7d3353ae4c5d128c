//! Rutas HTTP
//!
//! Router de la API de categorías y health check.

pub mod category_routes;
pub mod health_routes;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Crear el router principal de la aplicación
pub fn create_app_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .nest("/api/Article", category_routes::create_category_router())
        .merge(health_routes::create_health_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
