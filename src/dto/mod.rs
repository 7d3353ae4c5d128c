//! DTOs de la API HTTP

pub mod api_response;
pub mod category_dto;

pub use api_response::ApiResponse;
pub use category_dto::{CreateLabelResponse, LabelRequest, LabelsResponse};
