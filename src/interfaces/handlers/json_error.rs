use actix_web::{http::StatusCode, HttpResponse};

/// Uniform `{error}` body for failures raised outside [`AppError`](crate::errors::AppError).
pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error
    }))
}
