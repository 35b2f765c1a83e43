use actix_web::{http::header::LOCATION, web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::short_link::ShortenRequest,
    errors::AppError,
    use_cases::extractors::ApiKey,
    AppState,
};

#[instrument(skip(_key, state, data))]
pub async fn shorten_url(
    _key: ApiKey,
    state: web::Data<AppState>,
    data: web::Json<ShortenRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.shorten_handler.shorten(data.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state))]
pub async fn follow_link(
    short_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let target = state.shorten_handler.resolve(&short_id).await?;
    Ok(HttpResponse::Found().insert_header((LOCATION, target)).finish())
}
