use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{ConversionError, PdfConverter};

/// Runs `<program> <script> <input.html> <output.pdf>` and waits for it.
///
/// The default is `node PdfService/index.js`, a Puppeteer script.
#[derive(Debug, Clone)]
pub struct LocalProcessConverter {
    program: String,
    script: PathBuf,
}

impl LocalProcessConverter {
    pub fn new(program: impl Into<String>, script: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            script: script.into(),
        }
    }
}

#[async_trait]
impl PdfConverter for LocalProcessConverter {
    async fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), ConversionError> {
        let script = std::path::absolute(&self.script)?;
        let html_path = std::path::absolute(html_path)?;
        let pdf_path = std::path::absolute(pdf_path)?;

        debug!(
            "Running {} {} {} {}",
            self.program,
            script.display(),
            html_path.display(),
            pdf_path.display()
        );

        let output = Command::new(&self.program)
            .arg(&script)
            .arg(&html_path)
            .arg(&pdf_path)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ConversionError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("PDF converter failed ({}): {}", output.status, stderr);
            return Err(ConversionError::ProcessFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<(), ConversionError> {
        if tokio::fs::try_exists(&self.script).await? {
            Ok(())
        } else {
            Err(ConversionError::Unavailable(format!(
                "converter script {} not found",
                self.script.display()
            )))
        }
    }

    fn backend_name(&self) -> &'static str {
        "local-process"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("convert.sh");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn test_successful_conversion_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let script = script(dir.path(), "cp \"$1\" \"$2\"\n");
        let html = dir.path().join("in.html");
        let pdf = dir.path().join("out.pdf");
        std::fs::write(&html, "<html>hi</html>").unwrap();

        let converter = LocalProcessConverter::new("sh", script);
        converter.convert(&html, &pdf).await.unwrap();

        assert_eq!(std::fs::read_to_string(&pdf).unwrap(), "<html>hi</html>");
    }

    #[tokio::test]
    async fn test_non_zero_exit_carries_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let script = script(dir.path(), "echo 'chromium crashed' >&2\nexit 3\n");
        let html = dir.path().join("in.html");
        std::fs::write(&html, "<html></html>").unwrap();

        let converter = LocalProcessConverter::new("sh", script);
        let err = converter
            .convert(&html, &dir.path().join("out.pdf"))
            .await
            .unwrap_err();

        match &err {
            ConversionError::ProcessFailed { stderr, .. } => assert_eq!(stderr, "chromium crashed"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("chromium crashed"));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let converter = LocalProcessConverter::new("resumegen-no-such-binary", "index.js");
        let err = converter
            .convert(&dir.path().join("in.html"), &dir.path().join("out.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConversionError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_health_check_requires_script() {
        let dir = tempfile::tempdir().unwrap();
        let present = LocalProcessConverter::new("sh", script(dir.path(), "exit 0\n"));
        assert!(present.health_check().await.is_ok());

        let missing = LocalProcessConverter::new("sh", dir.path().join("missing.js"));
        assert!(matches!(
            missing.health_check().await,
            Err(ConversionError::Unavailable(_))
        ));
    }
}
