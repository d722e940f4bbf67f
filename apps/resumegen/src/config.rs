use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::render::bundled_template_dir;

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// When set, PDFs are produced by the remote service instead of a local process.
    pub pdf_service_url: Option<String>,
    pub pdf_script_path: PathBuf,
    pub node_binary: String,
    pub template_dir: PathBuf,
    pub data_dir: PathBuf,
    pub scratch_dir: PathBuf,
}

/// Which PDF backend to build. Decided once, at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfBackendConfig {
    LocalProcess { program: String, script: PathBuf },
    RemoteService { base_url: String },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pdf_service_url: optional_env("PDF_SERVICE_URL"),
            pdf_script_path: optional_env("PDF_SCRIPT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("PdfService/index.js")),
            node_binary: optional_env("NODE_BINARY").unwrap_or_else(|| "node".to_string()),
            template_dir: optional_env("TEMPLATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(bundled_template_dir),
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            scratch_dir: optional_env("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join("resumegen")),
        })
    }

    pub fn pdf_backend(&self) -> PdfBackendConfig {
        match &self.pdf_service_url {
            Some(url) => PdfBackendConfig::RemoteService {
                base_url: url.clone(),
            },
            None => PdfBackendConfig::LocalProcess {
                program: self.node_binary.clone(),
                script: self.pdf_script_path.clone(),
            },
        }
    }
}

/// Reads an env var, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
