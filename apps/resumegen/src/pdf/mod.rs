//! PDF conversion gateway.
//!
//! Two interchangeable backends turn an HTML file into a PDF file: a local
//! converter process, or a remote HTTP service. Which one runs is fixed when
//! the converter is built from config; callers only see `dyn PdfConverter`.

pub mod local;
pub mod remote;
pub mod scratch;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::PdfBackendConfig;

pub use local::LocalProcessConverter;
pub use remote::RemoteServiceConverter;
pub use scratch::ScratchFiles;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("could not start converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter exited with {status}: {stderr}")]
    ProcessFailed { status: String, stderr: String },

    #[error("PDF service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PDF service returned status {status}: {body}")]
    Service { status: u16, body: String },

    #[error("scratch file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("converter produced an empty PDF")]
    EmptyOutput,

    #[error("converter unavailable: {0}")]
    Unavailable(String),
}

/// Turns an HTML document on disk into a PDF document on disk.
///
/// Implementations never retry; the first failure is returned as-is.
#[async_trait]
pub trait PdfConverter: Send + Sync {
    async fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), ConversionError>;

    /// Readiness check for the backend.
    async fn health_check(&self) -> Result<(), ConversionError>;

    fn backend_name(&self) -> &'static str;
}

/// Builds the converter selected by config.
pub fn from_config(backend: &PdfBackendConfig) -> Arc<dyn PdfConverter> {
    match backend {
        PdfBackendConfig::LocalProcess { program, script } => {
            Arc::new(LocalProcessConverter::new(program.clone(), script.clone()))
        }
        PdfBackendConfig::RemoteService { base_url } => {
            Arc::new(RemoteServiceConverter::new(base_url))
        }
    }
}
