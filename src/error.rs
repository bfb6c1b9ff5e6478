use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::io_struct::ErrorResponse;

/// Failures of a `/predict` request.
///
/// Validation failures render as `{"error": ...}` JSON with a 4xx status.
/// Anything unexpected is a plain-text 500.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Please upload a CSV file")]
    UnsupportedFileType,

    #[error("CSV must have a \"text\" column")]
    MissingColumn,

    #[error("No text provided")]
    NoInputProvided,

    #[error("Invalid form body: {0}")]
    MalformedForm(String),

    #[error("Form field exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Model artifacts are not loaded")]
    ArtifactsUnavailable,

    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV file has no columns to parse")]
    EmptyCsv,

    #[error("text cell in row {row} is empty")]
    EmptyDocument { row: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedFileType
            | Self::MissingColumn
            | Self::NoInputProvided
            | Self::MalformedForm(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ArtifactsUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Csv(_) | Self::EmptyCsv | Self::EmptyDocument { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            log::error!("Prediction failed: {}", self);
            return HttpResponse::build(status)
                .content_type("text/plain; charset=utf-8")
                .body(self.to_string());
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}
