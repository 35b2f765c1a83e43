use async_trait::async_trait;

use crate::{
    entities::{dimensions::{DimensionRecord, Dimensions}},
    errors::AppError,
    repositories::sqlx_repo::SqlxDimensionRepo,
};

/// Durable path → dimensions store backing the viewer.
///
/// `put` is insert-or-ignore: the first record written for a path is canonical
/// and later writes for the same path are silently dropped.
#[async_trait]
pub trait DimensionCache: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<DimensionRecord>, AppError>;

    async fn put(&self, path: &str, dimensions: Dimensions) -> Result<(), AppError>;

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

impl SqlxDimensionRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxDimensionRepo { pool }
    }
}

#[async_trait]
impl DimensionCache for SqlxDimensionRepo {
    async fn get(&self, path: &str) -> Result<Option<DimensionRecord>, AppError> {
        let record = sqlx::query_as::<_, DimensionRecord>(
            "SELECT path, width, height FROM dimensions WHERE path = ?1"
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn put(&self, path: &str, dimensions: Dimensions) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO dimensions (path, width, height)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(path) DO NOTHING
            "#
        )
        .bind(path)
        .bind(i64::from(dimensions.width))
        .bind(i64::from(dimensions.height))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(path, "Dimensions already cached, insert ignored");
        }
        Ok(())
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }
}
