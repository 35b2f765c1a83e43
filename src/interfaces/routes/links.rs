use actix_web::web;

use crate::handlers::links;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/shorten")
            .route(web::put().to(links::shorten_url))
    )
    .service(
        web::resource("/l/{short_id}")
            .route(web::get().to(links::follow_link))
    );
}
