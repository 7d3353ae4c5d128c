use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::CategoryController;
use crate::dto::{ApiResponse, CreateLabelResponse, LabelRequest, LabelsResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_category_router() -> Router<AppState> {
    Router::new()
        .route("/GetCategories", get(get_categories))
        .route("/CreateNewLabel", post(create_new_label))
}

async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<LabelsResponse>>, AppError> {
    let controller = CategoryController::new(state.categories.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_new_label(
    State(state): State<AppState>,
    payload: Result<Json<LabelRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CreateLabelResponse>>, AppError> {
    let Json(request) = payload?;
    let controller = CategoryController::new(state.categories.clone());
    let response = controller.create(request).await?;
    Ok(Json(response))
}
