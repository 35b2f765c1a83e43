use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use tracing::info;
use std::{path::Path, time::Duration};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS dimensions (
        path TEXT PRIMARY KEY NOT NULL,
        width INTEGER NOT NULL CHECK (width >= 0),
        height INTEGER NOT NULL CHECK (height >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS short_links (
        short_id TEXT PRIMARY KEY NOT NULL,
        target_url TEXT NOT NULL
    )
    "#,
];

/// Opens (creating if needed) the SQLite database holding derived metadata.
pub async fn create_pool(database_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = SqliteConnectOptions::new()
        .filename(database_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    info!("Metadata database ready at {}", database_path.display());

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
