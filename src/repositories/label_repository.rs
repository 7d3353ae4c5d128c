use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use super::LabelRepository;
use crate::utils::errors::AppResult;

#[derive(Debug, sqlx::FromRow)]
pub struct ArticleLabel {
    pub id: i32,
    pub label: String,
}

#[derive(Clone)]
pub struct PgLabelRepository {
    pool: PgPool,
}

impl PgLabelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LabelRepository for PgLabelRepository {
    async fn list_all_labels(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query_as::<_, ArticleLabel>(
            "SELECT id, label FROM article_labels ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        debug!("📚 {} etiquetas leídas de la base de datos", rows.len());
        Ok(rows.into_iter().map(|row| row.label).collect())
    }

    async fn find_label(&self, label: &str) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM article_labels WHERE label = $1)"
        )
        .bind(label)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn insert_label(&self, label: &str) -> AppResult<()> {
        let row = sqlx::query_as::<_, ArticleLabel>(
            "INSERT INTO article_labels (label) VALUES ($1) RETURNING id, label"
        )
        .bind(label)
        .fetch_one(&self.pool)
        .await?;

        info!("💾 Etiqueta '{}' guardada con id {}", row.label, row.id);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
