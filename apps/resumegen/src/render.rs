//! HTML rendering of validated documents through MiniJinja templates.
//!
//! Templates and the shared stylesheet are read once in [`Renderer::from_dir`];
//! after that the renderer is immutable and safe to share across requests.

use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::models::resume::SECTIONS;
use crate::models::{CoverLetter, DocumentKind, Resume, ValidatedRecord, PERSONAL_INFORMATION};

pub const RESUME_TEMPLATE: &str = "resume_template.html.j2";
pub const COVER_LETTER_TEMPLATE: &str = "cover_letter_template.html.j2";
pub const CONTACT_PARTIAL: &str = "_contact.html.j2";
pub const STYLE_NAME: &str = "style.css";

/// Display format for the injected cover letter date.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Today's date as shown on a cover letter when no date is supplied.
pub fn today() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// The template directory bundled with the crate.
pub fn bundled_template_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
}

pub struct Renderer {
    env: Environment<'static>,
    style_css: String,
}

impl Renderer {
    /// Loads every template and the stylesheet from `dir`.
    ///
    /// A missing or unreadable asset is a configuration error, not a user error.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, AppError> {
        let dir = dir.as_ref();
        let mut env = Environment::new();
        // every interpolated value is user data
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        env.add_test("web_url", web_url_test);

        for name in [RESUME_TEMPLATE, COVER_LETTER_TEMPLATE, CONTACT_PARTIAL] {
            let source = read_asset(dir, name)?;
            env.add_template_owned(name, source).map_err(|e| {
                AppError::Configuration(format!("syntax error in template '{name}': {e}"))
            })?;
        }
        let style_css = read_asset(dir, STYLE_NAME)?;

        debug!("Loaded templates from {}", dir.display());
        Ok(Self { env, style_css })
    }

    /// Renders a validated record to HTML.
    ///
    /// `date` only applies to cover letters; it overrides both a `date` field
    /// in the letter body and the default of today.
    pub fn render(&self, record: &ValidatedRecord, date: Option<&str>) -> Result<String, AppError> {
        let (kind, context) = match record {
            ValidatedRecord::Resume(resume) => (DocumentKind::Resume, self.resume_context(resume)?),
            ValidatedRecord::CoverLetter(letter) => (
                DocumentKind::CoverLetter,
                self.cover_letter_context(letter, date)?,
            ),
        };

        let name = template_name(kind);
        let template = self
            .env
            .get_template(name)
            .map_err(|e| AppError::Configuration(format!("template '{name}' unavailable: {e}")))?;

        template
            .render(&context)
            .map_err(|e| AppError::Template(format!("failed to render '{name}': {e}")))
    }

    fn resume_context(&self, resume: &Resume) -> Result<Value, AppError> {
        let mut context = to_object(resume)?;
        for section in SECTIONS {
            let entry = context.entry(section).or_insert(Value::Null);
            if entry.is_null() {
                *entry = Value::Array(Vec::new());
            }
        }
        context.insert("style_css".into(), Value::String(self.style_css.clone()));
        Ok(Value::Object(context))
    }

    fn cover_letter_context(
        &self,
        letter: &CoverLetter,
        date: Option<&str>,
    ) -> Result<Value, AppError> {
        let mut context = to_object(letter)?;
        let info = context
            .entry(PERSONAL_INFORMATION)
            .or_insert(Value::Null);
        if info.is_null() {
            *info = Value::Object(Map::new());
        }

        let date = date
            .map(str::to_string)
            .or_else(|| letter.date().map(str::to_string))
            .unwrap_or_else(today);
        context.insert("date".into(), Value::String(date));
        context.insert("style_css".into(), Value::String(self.style_css.clone()));
        Ok(Value::Object(context))
    }
}

fn template_name(kind: DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Resume => RESUME_TEMPLATE,
        DocumentKind::CoverLetter => COVER_LETTER_TEMPLATE,
    }
}

/// `{% if x is web_url %}`. Undefined and non-string values are not URLs.
fn web_url_test(value: &minijinja::Value) -> bool {
    value.as_str().is_some_and(is_web_url)
}

/// Only http(s) URLs become links; anything else is rendered as text.
fn is_web_url(value: &str) -> bool {
    let value = value.trim_start();
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

fn read_asset(dir: &Path, name: &str) -> Result<String, AppError> {
    let path = dir.join(name);
    std::fs::read_to_string(&path).map_err(|e| {
        AppError::Configuration(format!("cannot read template asset {}: {e}", path.display()))
    })
}

fn to_object<T: serde::Serialize>(record: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(record).map_err(|e| AppError::Internal(e.into()))? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Internal(anyhow::anyhow!(
            "record serialized to a non-object: {other}"
        ))),
    }
}
