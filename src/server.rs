use std::{net::TcpListener, path::PathBuf};

use actix_web::{dev::Server, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::{routes::configure_routes, AppState};

/// Builds the HTTP server on an already bound listener.
pub fn create_server(
    listener: TcpListener,
    state: web::Data<AppState>,
    upload_dir: PathBuf,
    workers: usize,
) -> std::io::Result<Server> {
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, &upload_dir))
    })
    .listen(listener)?
    .workers(workers.max(1))
    .run();

    Ok(server)
}
