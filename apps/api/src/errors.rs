use std::error::Error as StdError;

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::DocumentError;
use crate::pipeline::PipelineError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Multipart(e) => (e.status(), "INVALID_UPLOAD", e.body_text()),
            AppError::Document(e) => match e {
                DocumentError::UnsupportedFormat(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FORMAT",
                    e.to_string(),
                ),
                DocumentError::UnreadableDocument { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNREADABLE_DOCUMENT",
                    e.to_string(),
                ),
                DocumentError::EmptyDocument(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "EMPTY_DOCUMENT",
                    e.to_string(),
                ),
            },
            AppError::Pipeline(e) => match e {
                PipelineError::GenerationFailure { stage, source, .. } => {
                    tracing::error!(caused_by = %cause_chain(source), "Generation error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_FAILURE",
                        format!("The text generation service failed during '{stage}'. Please try again."),
                    )
                }
                PipelineError::DeadlineExceeded { .. } => (
                    StatusCode::GATEWAY_TIMEOUT,
                    "DEADLINE_EXCEEDED",
                    "Cover letter generation took too long. Please try again.".to_string(),
                ),
                PipelineError::Cancelled { .. } => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "CANCELLED",
                    "The server is shutting down. Please try again shortly.".to_string(),
                ),
                PipelineError::EmptyStageList
                | PipelineError::DuplicateStageName(_)
                | PipelineError::MissingContext { .. } => {
                    tracing::error!("Pipeline configuration error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "PIPELINE_MISCONFIGURED",
                        "An internal server error occurred".to_string(),
                    )
                }
            },
        }
    }
}

/// Every error below `err` in its source chain, outermost first.
fn cause_chain(err: &dyn StdError) -> String {
    std::iter::successors(err.source(), |e: &&dyn StdError| (*e).source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentFormat;
    use crate::pipeline::GenerationError;

    #[test]
    fn test_unsupported_format_is_415() {
        let err = AppError::from(DocumentError::UnsupportedFormat("rtf".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[test]
    fn test_unreadable_document_is_422() {
        let err = AppError::from(DocumentError::UnreadableDocument {
            format: DocumentFormat::Docx,
            cause: "invalid zip header".into(),
        });
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "UNREADABLE_DOCUMENT");
        assert!(message.contains("invalid zip header"));
    }

    #[test]
    fn test_generation_failure_is_502_without_backend_details() {
        let err = AppError::from(PipelineError::GenerationFailure {
            stage: "drafting".to_string(),
            position: 5,
            total: 6,
            source: GenerationError::new("api key sk-secret rejected"),
        });
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "GENERATION_FAILURE");
        assert!(message.contains("drafting"));
        assert!(!message.contains("sk-secret"));
    }

    #[test]
    fn test_cause_chain_reaches_backend_error() {
        let backend = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let source = GenerationError::with_source("Anthropic API call failed", backend);
        assert_eq!(cause_chain(&source), "connection reset");
    }

    #[test]
    fn test_deadline_is_504() {
        let err = AppError::from(PipelineError::DeadlineExceeded {
            stage: "editing".to_string(),
        });
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_configuration_errors_are_500() {
        let err = AppError::from(PipelineError::EmptyStageList);
        let (status, code, _) = err.parts();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(code, "PIPELINE_MISCONFIGURED");
    }
}
