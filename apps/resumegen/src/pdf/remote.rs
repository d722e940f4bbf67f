use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ConversionError, PdfConverter};

/// Upper bound on one conversion round trip. Exceeding it is a failure, not a retry.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct GeneratePdfRequest<'a> {
    html: &'a str,
}

/// Posts HTML to `<base_url>/generate-pdf` and stores the returned bytes.
#[derive(Clone)]
pub struct RemoteServiceConverter {
    client: Client,
    base_url: String,
}

impl RemoteServiceConverter {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {e}");
                Client::new()
            });
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl PdfConverter for RemoteServiceConverter {
    async fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), ConversionError> {
        let html = tokio::fs::read_to_string(html_path).await?;
        let url = format!("{}/generate-pdf", self.base_url);
        debug!("POST {url} ({} bytes of HTML)", html.len());

        let response = self
            .client
            .post(&url)
            .json(&GeneratePdfRequest { html: &html })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("PDF service returned {}: {}", status, body);
            return Err(ConversionError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let pdf = response.bytes().await?;
        tokio::fs::write(pdf_path, &pdf).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), ConversionError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ConversionError::Service {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }

    fn backend_name(&self) -> &'static str {
        "remote-service"
    }
}
