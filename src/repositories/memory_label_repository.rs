use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use super::LabelRepository;
use crate::utils::errors::{conflict_error, AppResult};

/// Repositorio en memoria con la misma restricción de unicidad que la tabla
#[derive(Default)]
pub struct InMemoryLabelRepository {
    labels: RwLock<Vec<String>>,
}

impl InMemoryLabelRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: RwLock::new(labels.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl LabelRepository for InMemoryLabelRepository {
    async fn list_all_labels(&self) -> AppResult<Vec<String>> {
        Ok(self.labels.read().await.clone())
    }

    async fn find_label(&self, label: &str) -> AppResult<bool> {
        Ok(self.labels.read().await.iter().any(|l| l == label))
    }

    async fn insert_label(&self, label: &str) -> AppResult<()> {
        let mut labels = self.labels.write().await;
        if labels.iter().any(|l| l == label) {
            return Err(conflict_error("Label", "name", label));
        }
        labels.push(label.to_string());
        info!("💾 Etiqueta '{}' guardada en memoria", label);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }
}
