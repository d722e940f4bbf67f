//! Document generation: orchestrates the full pipeline.
//!
//! Flow: merge personal info → validate → render HTML → (optional) scratch
//!       files → PDF conversion → base64 → response.
//!
//! Each step short-circuits on failure. Scratch files are owned by a guard and
//! removed on every exit path.

use std::path::PathBuf;
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{
    validate, CoverLetter, DocumentKind, FieldError, OutputFormat, Resume, ValidatedRecord,
    ValidationErrors, PERSONAL_INFORMATION,
};
use crate::pdf::{ConversionError, PdfConverter, ScratchFiles};
use crate::render::Renderer;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// One generation call, shared by the CLI and HTTP adapters.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub kind: DocumentKind,
    /// Document payload: resume sections or cover letter body.
    pub payload: Value,
    /// Overrides any `personal_information` already inside `payload`.
    pub personal_info: Value,
    pub output_format: OutputFormat,
    /// Cover letter date override; `None` means the letter's own date or today.
    pub date: Option<String>,
}

/// `html_content` is set iff the format includes HTML, `pdf_content`
/// (base64) iff it includes PDF.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerationResponse {
    pub html_content: Option<String>,
    /// Base64-encoded PDF bytes.
    pub pdf_content: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BothDocumentsResponse {
    pub resume: GenerationResponse,
    pub cover_letter: GenerationResponse,
    pub message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

/// Stateless apart from read-only assets; cheap to clone and safe to call
/// concurrently.
#[derive(Clone)]
pub struct Generator {
    renderer: Arc<Renderer>,
    converter: Arc<dyn PdfConverter>,
    scratch_dir: PathBuf,
}

impl Generator {
    pub fn new(
        renderer: Arc<Renderer>,
        converter: Arc<dyn PdfConverter>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            converter,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn converter(&self) -> &dyn PdfConverter {
        self.converter.as_ref()
    }

    /// Merges personal info into the payload and validates the result.
    pub fn prepare(
        &self,
        kind: DocumentKind,
        payload: Value,
        personal_info: Value,
    ) -> Result<ValidatedRecord, AppError> {
        let merged = merge_personal_info(kind, payload, personal_info)?;
        Ok(validate(kind, &merged)?)
    }

    /// Validates and renders, without touching the PDF backend.
    pub fn render_html(
        &self,
        kind: DocumentKind,
        payload: Value,
        personal_info: Value,
        date: Option<&str>,
    ) -> Result<String, AppError> {
        let record = self.prepare(kind, payload, personal_info)?;
        self.renderer.render(&record, date)
    }

    /// Runs the full pipeline for one document.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AppError> {
        let GenerationRequest {
            kind,
            payload,
            personal_info,
            output_format,
            date,
        } = request;
        let job_id = job_id();
        info!("Generating {kind} as {output_format:?} (job {job_id})");

        // HTML is always rendered; PDF conversion consumes it.
        let html = self.render_html(kind, payload, personal_info, date.as_deref())?;

        let mut response = GenerationResponse {
            html_content: None,
            pdf_content: None,
            message: format!("{} generated successfully", kind.label()),
        };

        if output_format.includes_pdf() {
            let pdf = self.convert_to_pdf(kind, &job_id, &html).await.map_err(|e| {
                warn!("PDF conversion failed for job {job_id}: {e}");
                e
            })?;
            response.pdf_content = Some(STANDARD.encode(pdf));
        }

        if output_format.includes_html() {
            response.html_content = Some(html);
        }

        info!("Finished {kind} (job {job_id})");
        Ok(response)
    }

    /// Generates a resume and a cover letter concurrently from shared personal info.
    pub async fn generate_both(
        &self,
        resume_data: Value,
        cover_letter_data: Value,
        personal_info: Value,
        output_format: OutputFormat,
        date: Option<String>,
    ) -> Result<BothDocumentsResponse, AppError> {
        let resume = self.generate(GenerationRequest {
            kind: DocumentKind::Resume,
            payload: resume_data,
            personal_info: personal_info.clone(),
            output_format,
            date: None,
        });
        let cover_letter = self.generate(GenerationRequest {
            kind: DocumentKind::CoverLetter,
            payload: cover_letter_data,
            personal_info,
            output_format,
            date,
        });

        let (resume, cover_letter) = tokio::try_join!(resume, cover_letter)?;

        Ok(BothDocumentsResponse {
            resume,
            cover_letter,
            message: "Both documents generated successfully".to_string(),
        })
    }

    async fn convert_to_pdf(
        &self,
        kind: DocumentKind,
        job_id: &str,
        html: &str,
    ) -> Result<Vec<u8>, ConversionError> {
        let scratch = ScratchFiles::create_in(&self.scratch_dir, &format!("{kind}_{job_id}"))?;
        debug!(
            "Scratch files for job {job_id}: {} / {}",
            scratch.html_path().display(),
            scratch.pdf_path().display()
        );

        scratch.write_html(html).await?;
        self.converter
            .convert(scratch.html_path(), scratch.pdf_path())
            .await?;

        let pdf = scratch.read_pdf().await?;
        if pdf.is_empty() {
            return Err(ConversionError::EmptyOutput);
        }
        Ok(pdf)
    }
}

/// Places `personal_info` under `personal_information` in `payload`.
/// The explicit value always wins over one already in the payload.
pub fn merge_personal_info(
    kind: DocumentKind,
    payload: Value,
    personal_info: Value,
) -> Result<Value, ValidationErrors> {
    let Value::Object(mut map) = payload else {
        return Err(ValidationErrors::new(
            record_name(kind),
            vec![FieldError::new("__root__", "input should be a valid object")],
        ));
    };
    map.insert(PERSONAL_INFORMATION.to_string(), personal_info);
    Ok(Value::Object(map))
}

fn record_name(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Resume => Resume::RECORD,
        DocumentKind::CoverLetter => CoverLetter::RECORD,
    }
}

/// Short opaque id used in scratch file names and logs.
fn job_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::models::fixtures;
    use crate::render::bundled_template_dir;

    const STUB_PDF: &[u8] = b"%PDF-1.4 stub";

    /// Records every HTML path it sees; fails with `error` when set.
    #[derive(Default)]
    struct StubConverter {
        seen: Mutex<Vec<PathBuf>>,
        error: Option<String>,
    }

    #[async_trait]
    impl PdfConverter for StubConverter {
        async fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), ConversionError> {
            let html = tokio::fs::read_to_string(html_path).await?;
            assert!(html.contains("<html"));
            self.seen.lock().unwrap().push(html_path.to_path_buf());
            if let Some(stderr) = &self.error {
                return Err(ConversionError::ProcessFailed {
                    status: "exit status: 1".to_string(),
                    stderr: stderr.clone(),
                });
            }
            tokio::fs::write(pdf_path, STUB_PDF).await?;
            Ok(())
        }

        async fn health_check(&self) -> Result<(), ConversionError> {
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "stub"
        }
    }

    fn generator(converter: Arc<StubConverter>, scratch: &Path) -> Generator {
        let renderer = Arc::new(Renderer::from_dir(bundled_template_dir()).unwrap());
        Generator::new(renderer, converter, scratch)
    }

    fn request(format: OutputFormat) -> GenerationRequest {
        GenerationRequest {
            kind: DocumentKind::Resume,
            payload: json!({
                "work_experience": [{ "company": "Acme", "role": "Engineer" }],
            }),
            personal_info: fixtures::personal_info(),
            output_format: format,
            date: None,
        }
    }

    fn scratch_is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).map(|d| d.count() == 0).unwrap_or(true)
    }

    #[tokio::test]
    async fn test_html_only_skips_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let response = generator(stub.clone(), dir.path())
            .generate(request(OutputFormat::Html))
            .await
            .unwrap();

        let html = response.html_content.unwrap();
        assert!(html.contains("Jane") && html.contains("jane@x.com"));
        assert!(response.pdf_content.is_none());
        assert_eq!(response.message, "Resume generated successfully");
        assert!(stub.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_only_omits_html() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let response = generator(stub, dir.path())
            .generate(request(OutputFormat::Pdf))
            .await
            .unwrap();

        assert!(response.html_content.is_none());
        let pdf = STANDARD.decode(response.pdf_content.unwrap()).unwrap();
        assert_eq!(pdf, STUB_PDF);
        assert!(scratch_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let response = generator(stub, dir.path())
            .generate(request(OutputFormat::Both))
            .await
            .unwrap();
        assert!(response.html_content.is_some());
        assert!(response.pdf_content.is_some());
    }

    #[tokio::test]
    async fn test_validation_failure_has_no_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let mut req = request(OutputFormat::Both);
        req.personal_info.as_object_mut().unwrap().remove("email");

        let err = generator(stub.clone(), dir.path())
            .generate(req)
            .await
            .unwrap_err();

        match err {
            AppError::Validation(e) => {
                assert_eq!(e.fields().collect::<Vec<_>>(), vec!["personal_information.email"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(stub.seen.lock().unwrap().is_empty());
        assert!(scratch_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_conversion_failure_cleans_up_and_reports_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter {
            error: Some("Error generating PDF: net::ERR_FAILED".to_string()),
            ..Default::default()
        });

        let err = generator(stub.clone(), dir.path())
            .generate(request(OutputFormat::Both))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conversion(_)));
        assert!(err.to_string().contains("net::ERR_FAILED"));
        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].exists());
        assert!(scratch_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_concurrent_calls_use_distinct_scratch_files() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let generator = generator(stub.clone(), dir.path());

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let generator = generator.clone();
                tokio::spawn(async move { generator.generate(request(OutputFormat::Both)).await })
            })
            .collect();

        let mut htmls = Vec::new();
        for handle in handles {
            let response = handle.await.unwrap().unwrap();
            htmls.push(response.html_content.unwrap());
        }

        assert!(htmls.windows(2).all(|w| w[0] == w[1]));
        let mut seen = stub.seen.lock().unwrap().clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);
        assert!(scratch_is_empty(dir.path()));
    }

    #[tokio::test]
    async fn test_explicit_personal_info_wins() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let mut req = request(OutputFormat::Html);
        req.payload["personal_information"] = json!({ "name": "Someone Else" });

        let html = generator(stub, dir.path())
            .generate(req)
            .await
            .unwrap()
            .html_content
            .unwrap();
        assert!(html.contains("Jane"));
        assert!(!html.contains("Someone Else"));
    }

    #[tokio::test]
    async fn test_generate_both_documents() {
        let dir = tempfile::tempdir().unwrap();
        let stub = Arc::new(StubConverter::default());
        let response = generator(stub, dir.path())
            .generate_both(
                json!({}),
                json!({ "company": "Initech" }),
                fixtures::personal_info(),
                OutputFormat::Html,
                Some("02-03-2025".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(response.message, "Both documents generated successfully");
        assert_eq!(response.cover_letter.message, "Cover letter generated successfully");
        let letter = response.cover_letter.html_content.unwrap();
        assert!(letter.contains("Initech") && letter.contains("02-03-2025"));
        assert!(response.resume.html_content.unwrap().contains("Jane"));
    }

    #[test]
    fn test_non_object_payload_is_validation_error() {
        let err = merge_personal_info(DocumentKind::CoverLetter, json!("text"), json!({}))
            .unwrap_err();
        assert_eq!(err.record, "CoverLetter");
    }

    #[test]
    fn test_job_ids_are_short_and_distinct() {
        let a = job_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, job_id());
    }
}
