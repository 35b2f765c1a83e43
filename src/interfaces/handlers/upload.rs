use actix_multipart::Multipart;
use actix_web::{http::header::CONTENT_LENGTH, web::{self, Bytes}, HttpRequest, HttpResponse};
use futures_util::{Stream, StreamExt, TryStreamExt};
use tracing::instrument;

use crate::{
    entities::upload::UploadResponse,
    errors::{AppError, IngestError},
    use_cases::extractors::ApiKey,
    AppState,
};

#[instrument(skip(_key, req, state, payload))]
pub async fn upload_file(
    _key: ApiKey,
    req: HttpRequest,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
    // A declared length over the ceiling is refused before any byte is read.
    if let Some(declared) = declared_length(&req) {
        if declared > state.max_upload_bytes {
            tracing::warn!(declared, limit = state.max_upload_bytes, "Upload refused by Content-Length");
            return Err(AppError::PayloadTooLarge(state.max_upload_bytes));
        }
    }

    while let Some(field) = payload.try_next().await? {
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        // Plain form fields carry no file name; skip them.
        let Some(file_name) = file_name else { continue };

        let upload_handler = &state.upload_handler;
        let stream = limit_stream(field.map(|chunk| chunk.map_err(IngestError::from)), state.max_upload_bytes);
        let stored = upload_handler.store(&file_name, stream).await?;

        // Detached: the response below does not wait for post-processing.
        let _ = upload_handler.start_post_processing(&stored);

        return Ok(HttpResponse::Ok().json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_name: stored.locator,
        }));
    }

    Err(AppError::ValidationError("No file uploaded".to_string()))
}

fn declared_length(req: &HttpRequest) -> Option<u64> {
    req.headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Fails the stream once more than `limit` bytes have passed through.
pub fn limit_stream<S>(stream: S, limit: u64) -> impl Stream<Item = Result<Bytes, IngestError>> + Unpin
where
    S: Stream<Item = Result<Bytes, IngestError>> + Unpin,
{
    let mut seen = 0u64;
    stream.map(move |chunk| {
        let chunk = chunk?;
        seen += chunk.len() as u64;
        if seen > limit {
            Err(IngestError::TooLarge(limit))
        } else {
            Ok(chunk)
        }
    })
}
