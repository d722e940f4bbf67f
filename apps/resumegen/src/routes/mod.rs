pub mod health;
pub mod openapi;

use axum::{
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::generation::handlers;
use crate::state::AppState;

use self::openapi::ApiDoc;

/// Path of the interactive API docs advertised by `GET /`.
pub const DOCS_PATH: &str = "/docs";

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/generate-resume", post(handlers::handle_generate_resume))
        .route(
            "/generate-cover-letter",
            post(handlers::handle_generate_cover_letter),
        )
        .route("/generate-both", post(handlers::handle_generate_both))
        .with_state(state)
        .merge(SwaggerUi::new(DOCS_PATH).url("/openapi.json", ApiDoc::openapi()))
}
