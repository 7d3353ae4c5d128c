use validator::Validate;

use crate::dto::{ApiResponse, CreateLabelResponse, LabelRequest, LabelsResponse};
use crate::services::{CategoryCache, CategorySource};
use crate::utils::errors::AppError;

pub struct CategoryController {
    categories: CategoryCache,
}

impl CategoryController {
    pub fn new(categories: CategoryCache) -> Self {
        Self { categories }
    }

    pub async fn list(&self) -> Result<ApiResponse<LabelsResponse>, AppError> {
        let (labels, source) = self.categories.get_categories_with_source().await?;

        let message = match source {
            CategorySource::Cache => "Get labels success from Redis",
            CategorySource::Database => "Get labels success",
        };

        Ok(ApiResponse::success_with_message(
            LabelsResponse {
                code: "GET_LABELS_SUCCESS",
                source,
                labels,
            },
            message.to_string(),
        ))
    }

    pub async fn create(
        &self,
        request: LabelRequest,
    ) -> Result<ApiResponse<CreateLabelResponse>, AppError> {
        request.validate()?;

        self.categories.create_label(&request.label).await?;

        Ok(ApiResponse::success_with_message(
            CreateLabelResponse {
                code: "CREATE_LABEL_SUCCESS",
                label: request.label,
            },
            "Create label success".to_string(),
        ))
    }
}
