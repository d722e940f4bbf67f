use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::models::ValidationErrors;
use crate::pdf::ConversionError;

/// JSON body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
    #[schema(example = "VALIDATION_ERROR")]
    pub code: String,
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// User data failed the schema contract.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The request body could not be decoded into the transport shape.
    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// Bad input file handed to the CLI (wrong extension and the like).
    #[error("Invalid input: {0}")]
    Input(String),

    /// Missing template assets or a misconfigured backend. Not user-recoverable.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("PDF conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::UnprocessableEntity(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE_ENTITY")
            }
            AppError::Input(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::Template(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_ERROR"),
            AppError::Conversion(_) => (StatusCode::BAD_GATEWAY, "CONVERSION_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Any failure to decode a request body is a transport-level rejection.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::UnprocessableEntity(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let detail = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                format!("Generation failed: {self}")
            }
            AppError::Template(msg) => {
                tracing::error!("Template error: {msg}");
                format!("Generation failed: {self}")
            }
            AppError::Conversion(e) => {
                tracing::error!("PDF conversion error: {e}");
                format!("Generation failed: {self}")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            _ => format!("Generation failed: {self}"),
        };

        let body = Json(ErrorResponse {
            detail,
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
