use std::path::Path;

use actix_files::Files;
use actix_web::web;

/// Raw bytes of stored assets under `/f/{date}/{filename}`.
pub fn config_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
    cfg.service(
        Files::new("/f", upload_dir)
            .use_etag(true)
            .use_last_modified(true)
    );
}
