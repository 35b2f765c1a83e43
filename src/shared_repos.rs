use crate::repositories::sqlx_repo::{SqlxDimensionRepo, SqlxShortLinkRepo};

#[derive(Clone)]
pub struct SharedRepositories {
    pub dimension_repo: SqlxDimensionRepo,
    pub short_link_repo: SqlxShortLinkRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let dimension_repo = SqlxDimensionRepo::new(pool.clone());
        let short_link_repo = SqlxShortLinkRepo::new(pool);

        SharedRepositories {
            dimension_repo,
            short_link_repo,
        }
    }
}
