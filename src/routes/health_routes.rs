use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::dto::ApiResponse;
use crate::services::BackendStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub environment: String,
    pub backends: BackendStatus,
    pub timestamp: String,
}

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check: 503 si alguno de los backends no responde
async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<HealthResponse>>) {
    let backends = state.categories.backend_status().await;
    let (status_code, status) = if backends.is_healthy() {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let response = HealthResponse {
        status,
        environment: state.config.environment.clone(),
        backends,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    let mut body = ApiResponse::success(response);
    body.success = backends.is_healthy();
    (status_code, Json(body))
}
