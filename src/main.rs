use std::net::TcpListener;

use actix_web::web;
use mediashare::{
    db::sqlite::create_pool,
    graceful_shutdown::shutdown_signal,
    server::create_server,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    AppComponents, AppState,
};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if config.is_production() && !config.host.starts_with("https://") {
        tracing::warn!("HOST {} is not https; og:video:secure_url will be omitted", config.host);
    }

    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let pool = match create_pool(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to open metadata database: {}", e);
            std::process::exit(1);
        }
    };

    let components = AppComponents::production(&config, SharedRepositories::new(pool.clone()));
    let app_state = web::Data::new(AppState::new(&config, components));

    let listener = TcpListener::bind(config.listen_addr())?;
    tracing::info!(
        "Starting mediashare v{} on {} (public host {})",
        env!("CARGO_PKG_VERSION"),
        listener.local_addr()?,
        config.host
    );

    let server = create_server(
        listener,
        app_state,
        config.upload_dir.clone(),
        config.worker_count,
    )?;
    let handle = server.handle();

    let result = tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            Ok(())
        }
    };

    pool.close().await;
    result
}
