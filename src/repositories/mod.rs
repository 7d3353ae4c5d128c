//! Repositorios
//!
//! Acceso a la fuente de verdad de las etiquetas de artículos.

pub mod label_repository;
pub mod memory_label_repository;

use async_trait::async_trait;

use crate::utils::errors::AppResult;

pub use label_repository::PgLabelRepository;
pub use memory_label_repository::InMemoryLabelRepository;

/// Fuente de verdad durable de las etiquetas.
#[async_trait]
pub trait LabelRepository: Send + Sync {
    /// Todas las etiquetas en orden de inserción
    async fn list_all_labels(&self) -> AppResult<Vec<String>>;

    /// Búsqueda por coincidencia exacta (sensible a mayúsculas)
    async fn find_label(&self, label: &str) -> AppResult<bool>;

    /// Inserta la etiqueta. Devuelve `AppError::Conflict` si la restricción
    /// de unicidad del almacenamiento la rechaza.
    async fn insert_label(&self, label: &str) -> AppResult<()>;

    /// Verificar si el almacenamiento responde
    async fn is_connected(&self) -> bool;
}
