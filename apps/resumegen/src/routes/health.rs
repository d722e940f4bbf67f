use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

use super::DOCS_PATH;

#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    #[schema(example = "Resume Generator API")]
    pub message: String,
    /// Where the Swagger UI is mounted.
    #[schema(example = "/docs")]
    pub docs: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "Resume Generator")]
    pub service: String,
    pub version: String,
    /// Active PDF conversion backend.
    #[schema(example = "local-process")]
    pub pdf_backend: String,
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    responses((status = 200, description = "Service banner", body = RootResponse))
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Resume Generator API".to_string(),
        docs: DOCS_PATH.to_string(),
    })
}

/// GET /health
/// Reports service liveness and which PDF backend is configured.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "Resume Generator".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        pdf_backend: state.generator.converter().backend_name().to_string(),
    })
}
