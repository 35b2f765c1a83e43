use async_trait::async_trait;

use crate::{
    entities::short_link::ShortLink,
    errors::AppError,
    repositories::sqlx_repo::SqlxShortLinkRepo,
};

#[async_trait]
pub trait ShortLinkRepository: Send + Sync {
    /// Stores a link. Returns `false` when the id is already taken.
    async fn insert_link(&self, link: &ShortLink) -> Result<bool, AppError>;

    async fn get_link(&self, short_id: &str) -> Result<Option<ShortLink>, AppError>;
}

impl SqlxShortLinkRepo {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        SqlxShortLinkRepo { pool }
    }
}

#[async_trait]
impl ShortLinkRepository for SqlxShortLinkRepo {
    async fn insert_link(&self, link: &ShortLink) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_links (short_id, target_url)
            VALUES (?1, ?2)
            ON CONFLICT(short_id) DO NOTHING
            "#
        )
        .bind(&link.short_id)
        .bind(&link.target_url)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_link(&self, short_id: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            "SELECT short_id, target_url FROM short_links WHERE short_id = ?1"
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(link)
    }
}
