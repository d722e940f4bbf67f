use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::generation::handlers::{BothRequest, CoverLetterRequest, ResumeRequest};
use crate::generation::{BothDocumentsResponse, GenerationResponse};
use crate::models::OutputFormat;

use super::health::{HealthResponse, RootResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resume Generator API",
        description = "Render resumes and cover letters from JSON to HTML and PDF."
    ),
    tags(
        (name = "Health", description = "Service banner and liveness"),
        (name = "Generation", description = "Resume and cover letter generation")
    ),
    paths(
        super::health::root_handler,
        super::health::health_handler,
        crate::generation::handlers::handle_generate_resume,
        crate::generation::handlers::handle_generate_cover_letter,
        crate::generation::handlers::handle_generate_both,
    ),
    components(schemas(
        RootResponse, HealthResponse,
        ResumeRequest, CoverLetterRequest, BothRequest, OutputFormat,
        GenerationResponse, BothDocumentsResponse,
        ErrorResponse,
    ))
)]
pub struct ApiDoc;
