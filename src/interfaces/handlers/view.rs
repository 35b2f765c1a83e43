use actix_web::{
    http::header::{ContentType, LOCATION, USER_AGENT},
    web, HttpRequest, HttpResponse,
};
use tracing::instrument;

use crate::{errors::AppError, use_cases::render::Rendered, AppState};

#[instrument(skip(req, state))]
pub async fn view_asset(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (date, file_name) = path.into_inner();
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());

    match state.render_handler.render(&date, &file_name, user_agent).await? {
        Rendered::Page(html) => Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html)),
        Rendered::Redirect(location) => Ok(HttpResponse::Found()
            .insert_header((LOCATION, location))
            .finish()),
    }
}
