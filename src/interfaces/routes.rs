use std::path::Path;

use actix_web::web;

mod files;
mod json_error;
mod links;
mod system;
mod upload;
mod view;

pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path) {
    cfg.configure(json_error::config_routes)
        .configure(system::config_routes)
        .configure(upload::config_routes)
        .configure(view::config_routes)
        .configure(links::config_routes)
        .configure(|cfg| files::config_routes(cfg, upload_dir));
}
