//! File helpers for the CLI: JSON inputs in, HTML out.

use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::errors::AppError;

/// Reads a JSON document. Anything without a `.json` extension is rejected
/// before the file is opened.
pub async fn load_json(path: &Path) -> Result<Value, AppError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(AppError::Input(format!(
            "Invalid file: {}. Input file must be a JSON file.",
            path.display()
        )));
    }

    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::Input(format!("cannot read {}: {e}", path.display())))?;
    let value = serde_json::from_str(&text)
        .map_err(|e| AppError::Input(format!("{} is not valid JSON: {e}", path.display())))?;
    Ok(value)
}

/// Writes rendered HTML, creating parent directories as needed.
pub async fn save_html(content: &str, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_json_reads_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.JSON");
        std::fs::write(&path, r#"{"name": "Jane"}"#).unwrap();
        let value = load_json(&path).await.unwrap();
        assert_eq!(value["name"], "Jane");
    }

    #[tokio::test]
    async fn test_load_json_rejects_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.txt");
        std::fs::write(&path, "some content").unwrap();
        let err = load_json(&path).await.unwrap_err();
        assert!(matches!(err, AppError::Input(ref msg) if msg.contains("must be a JSON file")));
    }

    #[tokio::test]
    async fn test_load_json_missing_file() {
        let err = load_json(Path::new("/nonexistent/file_example.json"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Input(ref msg) if msg.contains("file_example.json")));
    }

    #[tokio::test]
    async fn test_load_json_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_json(&path).await, Err(AppError::Input(_))));
    }

    #[tokio::test]
    async fn test_save_html_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("resume.html");
        save_html("<html></html>", &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
