//! Sistema de manejo de errores
//!
//! Este módulo define los errores del servicio de categorías
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Código SQLSTATE de Postgres para violaciones de unicidad
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Código estable que viaja en el sobre JSON de error
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "MISS_LABEL_NAME",
            AppError::Conflict(_) => "LABEL_EXISTS",
            AppError::NotFound(_) => "NO_LABELS_FOUND",
            AppError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AppError::Config(_) => "CONFIG_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return AppError::Conflict("Label already exists in database".to_string());
            }
        }
        AppError::StorageUnavailable(format!("database: {}", e))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::StorageUnavailable(format!("redis: {}", e))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::ValidationError(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (title, message) = match &self {
            AppError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                ("Validation Error", "Miss Label Name".to_string())
            }
            AppError::Conflict(msg) => {
                warn!("Conflict: {}", msg);
                ("Conflict", "Label already exists".to_string())
            }
            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                ("Not Found", "No labels found".to_string())
            }
            AppError::StorageUnavailable(msg) => {
                error!("Storage unavailable: {}", msg);
                (
                    "Service Unavailable",
                    "A storage backend is unreachable, please retry later".to_string(),
                )
            }
            AppError::Config(msg) => {
                error!("Configuration error: {}", msg);
                ("Internal Server Error", "An unexpected error occurred".to_string())
            }
        };

        let body = ErrorResponse {
            error: title.to_string(),
            message,
            code: self.code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", resource, field, value))
}
