use actix_multipart::MultipartError;
use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::Display;
use validator::ValidationErrors;

#[derive(Debug, Display)]
pub enum AppError {
    #[display("Not found")]
    NotFound,

    #[display("Unauthorized")]
    Unauthorized,

    #[display("Validation error: {_0}")]
    ValidationError(String),

    #[display("Payload too large: limit is {_0} bytes")]
    PayloadTooLarge(u64),

    #[display("Storage failure")]
    StorageFailure,

    #[display("Internal server error: {_0}")]
    InternalError(String),
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        // Internal details never leave the process; they are logged where they happen.
        let message = match self {
            AppError::InternalError(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(serde_json::json!({"error": message}))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound,
            _ => AppError::InternalError(format!("Database error: {}", err)),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Storage I/O error: {}", err);
        AppError::StorageFailure
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::ValidationError(format!("invalid field(s): {}", fields))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err {
            MultipartError::ContentTypeMissing
            | MultipartError::ContentTypeParse
            | MultipartError::ContentTypeIncompatible
            | MultipartError::BoundaryMissing => {
                AppError::ValidationError("Request must be multipart/form-data".to_string())
            }
            _ => AppError::ValidationError(format!("Malformed multipart body: {}", err)),
        }
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::TooLarge(limit) => AppError::PayloadTooLarge(limit),
            IngestError::Payload(msg) => {
                tracing::warn!("Upload stream aborted: {}", msg);
                AppError::ValidationError("Upload stream aborted".to_string())
            }
        }
    }
}

/// Failures raised by the byte source feeding the upload pipeline.
#[derive(Debug, Display)]
pub enum IngestError {
    #[display("Upload exceeds {_0} bytes")]
    TooLarge(u64),

    #[display("Payload error: {_0}")]
    Payload(String),
}

impl std::error::Error for IngestError {}

impl From<MultipartError> for IngestError {
    fn from(err: MultipartError) -> Self {
        IngestError::Payload(err.to_string())
    }
}
