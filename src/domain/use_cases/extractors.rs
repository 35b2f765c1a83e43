use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::{errors::AppError, AppState};

/// Proof that the request carried the configured API key in `Authorization`.
///
/// The header value must match exactly; missing, malformed and wrong keys are
/// all the same 401.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequest for ApiKey {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            tracing::error!("AppState missing in ApiKey extractor");
            return ready(Err(AppError::InternalError("application state missing".to_string())));
        };

        let authorized = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .is_some_and(|key| !state.api_key.is_empty() && key == state.api_key);

        if authorized {
            ready(Ok(ApiKey))
        } else {
            tracing::warn!(path = req.path(), "Rejected request with missing or wrong API key");
            ready(Err(AppError::Unauthorized))
        }
    }
}
