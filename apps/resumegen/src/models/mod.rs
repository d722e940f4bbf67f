//! Input schemas for generation: personal info, resume, cover letter.
//!
//! Validation is explicit: each record walks its JSON object, collects every
//! offending field, and only then decides. Unknown fields are ignored.

pub mod cover_letter;
pub mod personal_info;
pub mod resume;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

pub use cover_letter::CoverLetter;
pub use personal_info::PersonalInfo;
pub use resume::Resume;

/// Key under which personal info lives inside a document payload.
pub const PERSONAL_INFORMATION: &str = "personal_information";

/// Which document a generation call produces. Selects both schema and template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
        }
    }

    /// Human-facing name, used in success messages and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "Cover letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which artifacts a generation call returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Html,
    Pdf,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn includes_html(&self) -> bool {
        matches!(self, OutputFormat::Html | OutputFormat::Both)
    }

    pub fn includes_pdf(&self) -> bool {
        matches!(self, OutputFormat::Pdf | OutputFormat::Both)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation errors
// ────────────────────────────────────────────────────────────────────────────

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Every field-level failure for one record, in encounter order.
#[derive(Debug, Clone, Error)]
#[error("{}", render_errors(.record, .errors))]
pub struct ValidationErrors {
    pub record: &'static str,
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(record: &'static str, errors: Vec<FieldError>) -> Self {
        Self { record, errors }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

/// Header is always "<n> validation errors for <Record>", even for one failure;
/// callers match on the plural phrase.
fn render_errors(record: &str, errors: &[FieldError]) -> String {
    let mut out = format!("{} validation errors for {record}", errors.len());
    for e in errors {
        out.push('\n');
        out.push_str(&e.field);
        out.push_str(": ");
        out.push_str(&e.reason);
    }
    out
}

const FIELD_REQUIRED: &str = "field required";
const EXPECTED_STRING: &str = "input should be a valid string";
const EXPECTED_LIST: &str = "input should be a valid list";
const EXPECTED_OBJECT: &str = "input should be a valid object";

/// Collects field errors while reading values out of a JSON object.
///
/// Accessors return `None` on failure after recording the reason, so a record
/// can be read in one pass and checked once at the end.
pub(crate) struct FieldReader<'a> {
    map: &'a Map<String, Value>,
    prefix: &'a str,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(map: &'a Map<String, Value>, prefix: &'a str) -> Self {
        Self {
            map,
            prefix,
            errors: Vec::new(),
        }
    }

    /// Wraps a raw value, failing at the root when it is not an object.
    pub(crate) fn object(
        record: &'static str,
        value: &'a Value,
    ) -> Result<&'a Map<String, Value>, ValidationErrors> {
        value.as_object().ok_or_else(|| {
            ValidationErrors::new(record, vec![FieldError::new("__root__", EXPECTED_OBJECT)])
        })
    }

    fn path(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.prefix)
        }
    }

    pub(crate) fn push(&mut self, key: &str, reason: &str) {
        let field = self.path(key);
        self.errors.push(FieldError::new(field, reason));
    }

    fn extend(&mut self, errors: Vec<FieldError>) {
        self.errors.extend(errors);
    }

    fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    pub(crate) fn required_str(&mut self, key: &str) -> Option<String> {
        match self.raw(key) {
            None => {
                self.push(key, FIELD_REQUIRED);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, EXPECTED_STRING);
                None
            }
        }
    }

    pub(crate) fn optional_str(&mut self, key: &str) -> Option<String> {
        match self.raw(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.push(key, EXPECTED_STRING);
                None
            }
        }
    }

    /// Absent and `null` both read as `None`; any non-array value is an error.
    pub(crate) fn optional_list(&mut self, key: &str) -> Option<Vec<Value>> {
        match self.raw(key) {
            None => None,
            Some(Value::Array(items)) => Some(items.clone()),
            Some(_) => {
                self.push(key, EXPECTED_LIST);
                None
            }
        }
    }

    pub(crate) fn required_object(&mut self, key: &str) -> Option<&'a Value> {
        match self.raw(key) {
            None => {
                self.push(key, FIELD_REQUIRED);
                None
            }
            Some(v @ Value::Object(_)) => Some(v),
            Some(_) => {
                self.push(key, EXPECTED_OBJECT);
                None
            }
        }
    }

    /// Reads the nested personal info block, folding its errors in under the
    /// `personal_information.` prefix.
    pub(crate) fn personal_information(&mut self) -> Option<PersonalInfo> {
        let Some(Value::Object(info)) = self.required_object(PERSONAL_INFORMATION) else {
            return None;
        };
        match PersonalInfo::read(FieldReader::new(info, PERSONAL_INFORMATION)) {
            Ok(info) => Some(info),
            Err(errors) => {
                self.extend(errors);
                None
            }
        }
    }

    pub(crate) fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub(crate) fn finish(self, record: &'static str) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(record, self.errors))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dispatch by document kind
// ────────────────────────────────────────────────────────────────────────────

/// A record that passed its schema and is ready to render.
#[derive(Debug, Clone)]
pub enum ValidatedRecord {
    Resume(Resume),
    CoverLetter(CoverLetter),
}

impl ValidatedRecord {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ValidatedRecord::Resume(_) => DocumentKind::Resume,
            ValidatedRecord::CoverLetter(_) => DocumentKind::CoverLetter,
        }
    }

    pub fn personal_information(&self) -> &PersonalInfo {
        match self {
            ValidatedRecord::Resume(r) => &r.personal_information,
            ValidatedRecord::CoverLetter(c) => &c.personal_information,
        }
    }
}

/// Validates a raw payload against the schema for `kind`.
pub fn validate(kind: DocumentKind, raw: &Value) -> Result<ValidatedRecord, ValidationErrors> {
    match kind {
        DocumentKind::Resume => Resume::validate(raw).map(ValidatedRecord::Resume),
        DocumentKind::CoverLetter => CoverLetter::validate(raw).map(ValidatedRecord::CoverLetter),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_format_inclusion() {
        assert!(OutputFormat::Html.includes_html());
        assert!(!OutputFormat::Html.includes_pdf());
        assert!(!OutputFormat::Pdf.includes_html());
        assert!(OutputFormat::Pdf.includes_pdf());
        assert!(OutputFormat::Both.includes_html() && OutputFormat::Both.includes_pdf());
    }

    #[test]
    fn test_output_format_deserializes_lowercase() {
        let f: OutputFormat = serde_json::from_value(json!("pdf")).unwrap();
        assert_eq!(f, OutputFormat::Pdf);
        assert!(serde_json::from_value::<OutputFormat>(json!("docx")).is_err());
        assert_eq!(OutputFormat::default(), OutputFormat::Both);
    }

    #[test]
    fn test_error_message_always_says_validation_errors() {
        let one = ValidationErrors::new("PersonalInfo", vec![FieldError::new("email", "x")]);
        assert!(one.to_string().starts_with("1 validation errors for PersonalInfo"));

        let two = ValidationErrors::new(
            "PersonalInfo",
            vec![FieldError::new("email", "x"), FieldError::new("phone", "y")],
        );
        let msg = two.to_string();
        assert!(msg.contains("2 validation errors for PersonalInfo"));
        assert!(msg.contains("email: x"));
        assert!(msg.contains("phone: y"));
    }

    #[test]
    fn test_validate_dispatches_by_kind() {
        let payload = json!({ "personal_information": fixtures::personal_info() });
        let record = validate(DocumentKind::Resume, &payload).unwrap();
        assert_eq!(record.kind(), DocumentKind::Resume);

        let record = validate(DocumentKind::CoverLetter, &payload).unwrap();
        assert_eq!(record.kind(), DocumentKind::CoverLetter);
        assert_eq!(record.personal_information().name, "Jane");
    }

    #[test]
    fn test_non_object_payload_fails_at_root() {
        let err = validate(DocumentKind::Resume, &json!([1, 2])).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["__root__"]);
    }
}
