use actix_web::web;

use crate::handlers::view;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/s/{date}/{filename}")
            .route(web::get().to(view::view_asset))
    );
}
