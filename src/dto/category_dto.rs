use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::services::CategorySource;

// Request para crear una etiqueta. Un campo ausente equivale a vacío.
#[derive(Debug, Deserialize, Validate)]
pub struct LabelRequest {
    #[serde(default, alias = "Label")]
    #[validate(length(min = 1, message = "Miss Label Name"))]
    pub label: String,
}

// Response del listado de etiquetas
#[derive(Debug, Serialize)]
pub struct LabelsResponse {
    pub code: &'static str,
    pub source: CategorySource,
    pub labels: Vec<String>,
}

// Response de creación de etiqueta
#[derive(Debug, Serialize)]
pub struct CreateLabelResponse {
    pub code: &'static str,
    pub label: String,
}
