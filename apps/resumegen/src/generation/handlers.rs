//! Axum route handlers for the Generation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::generation::generator::{BothDocumentsResponse, GenerationRequest, GenerationResponse};
use crate::models::{DocumentKind, OutputFormat};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResumeRequest {
    #[schema(value_type = Object)]
    pub resume_data: Map<String, Value>,
    #[schema(value_type = Object)]
    pub personal_info: Map<String, Value>,
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CoverLetterRequest {
    #[schema(value_type = Object)]
    pub cover_letter_data: Map<String, Value>,
    #[schema(value_type = Object)]
    pub personal_info: Map<String, Value>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    /// DD-MM-YYYY; defaults to the letter's own date, then today.
    #[schema(example = "01-06-2025")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BothRequest {
    #[schema(value_type = Object)]
    pub resume_data: Map<String, Value>,
    #[schema(value_type = Object)]
    pub cover_letter_data: Map<String, Value>,
    #[schema(value_type = Object)]
    pub personal_info: Map<String, Value>,
    #[serde(default)]
    pub output_format: OutputFormat,
    #[serde(default)]
    /// DD-MM-YYYY; defaults to the letter's own date, then today.
    #[schema(example = "01-06-2025")]
    pub date: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate-resume
#[utoipa::path(
    post,
    path = "/generate-resume",
    tag = "Generation",
    request_body = ResumeRequest,
    responses(
        (status = 200, description = "Resume generated", body = GenerationResponse),
        (status = 400, description = "Payload failed validation", body = ErrorResponse),
        (status = 422, description = "Request body could not be decoded", body = ErrorResponse),
        (status = 502, description = "PDF conversion failed", body = ErrorResponse)
    )
)]
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    payload: Result<Json<ResumeRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload?;
    let response = state
        .generator
        .generate(GenerationRequest {
            kind: DocumentKind::Resume,
            payload: Value::Object(request.resume_data),
            personal_info: Value::Object(request.personal_info),
            output_format: request.output_format,
            date: None,
        })
        .await?;
    Ok(Json(response))
}

/// POST /generate-cover-letter
#[utoipa::path(
    post,
    path = "/generate-cover-letter",
    tag = "Generation",
    request_body = CoverLetterRequest,
    responses(
        (status = 200, description = "Cover letter generated", body = GenerationResponse),
        (status = 400, description = "Payload failed validation", body = ErrorResponse),
        (status = 422, description = "Request body could not be decoded", body = ErrorResponse),
        (status = 502, description = "PDF conversion failed", body = ErrorResponse)
    )
)]
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    payload: Result<Json<CoverLetterRequest>, JsonRejection>,
) -> Result<Json<GenerationResponse>, AppError> {
    let Json(request) = payload?;
    let response = state
        .generator
        .generate(GenerationRequest {
            kind: DocumentKind::CoverLetter,
            payload: Value::Object(request.cover_letter_data),
            personal_info: Value::Object(request.personal_info),
            output_format: request.output_format,
            date: request.date,
        })
        .await?;
    Ok(Json(response))
}

/// POST /generate-both
///
/// Resume and cover letter from one shared personal info block.
#[utoipa::path(
    post,
    path = "/generate-both",
    tag = "Generation",
    request_body = BothRequest,
    responses(
        (status = 200, description = "Both documents generated", body = BothDocumentsResponse),
        (status = 400, description = "Payload failed validation", body = ErrorResponse),
        (status = 422, description = "Request body could not be decoded", body = ErrorResponse),
        (status = 502, description = "PDF conversion failed", body = ErrorResponse)
    )
)]
pub async fn handle_generate_both(
    State(state): State<AppState>,
    payload: Result<Json<BothRequest>, JsonRejection>,
) -> Result<Json<BothDocumentsResponse>, AppError> {
    let Json(request) = payload?;
    let response = state
        .generator
        .generate_both(
            Value::Object(request.resume_data),
            Value::Object(request.cover_letter_data),
            Value::Object(request.personal_info),
            request.output_format,
            request.date,
        )
        .await?;
    Ok(Json(response))
}
