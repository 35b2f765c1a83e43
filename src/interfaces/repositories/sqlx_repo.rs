use sqlx::SqlitePool;

#[derive(Clone)]
pub struct SqlxDimensionRepo {
    pub pool: SqlitePool,
}

#[derive(Clone)]
pub struct SqlxShortLinkRepo {
    pub pool: SqlitePool,
}
