use std::io;
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

/// The HTML/PDF file pair handed to a converter for one generation call.
///
/// Both files are unlinked when this value is dropped, whether the call
/// succeeded, failed, or its future was abandoned mid-conversion.
pub struct ScratchFiles {
    html: NamedTempFile,
    pdf: NamedTempFile,
}

impl ScratchFiles {
    /// Creates `<prefix>_XXXXXX.html` and `<prefix>_XXXXXX.pdf` in `dir`.
    ///
    /// Names carry random suffixes and are created exclusively, so concurrent
    /// calls with the same prefix never collide.
    pub fn create_in(dir: &Path, prefix: &str) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let prefix = format!("{prefix}_");
        let html = Builder::new()
            .prefix(&prefix)
            .suffix(".html")
            .tempfile_in(dir)?;
        let pdf = Builder::new()
            .prefix(&prefix)
            .suffix(".pdf")
            .tempfile_in(dir)?;
        Ok(Self { html, pdf })
    }

    pub fn html_path(&self) -> &Path {
        self.html.path()
    }

    pub fn pdf_path(&self) -> &Path {
        self.pdf.path()
    }

    pub async fn write_html(&self, html: &str) -> io::Result<()> {
        tokio::fs::write(self.html_path(), html).await
    }

    pub async fn read_pdf(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.pdf_path()).await
    }
}
