use actix_web::web;

use crate::handlers::system;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(system::health_check))
    )
    .service(
        web::resource("/assets/audio.svg")
            .route(web::get().to(system::audio_icon))
    );
}
