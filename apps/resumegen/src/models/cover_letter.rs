use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{FieldError, FieldReader, PersonalInfo, ValidationErrors, PERSONAL_INFORMATION};

/// A cover letter: personal info plus free-form body fields.
///
/// Everything other than `personal_information` is kept verbatim in `content`
/// and handed to the template as top-level variables (`company`, `position`,
/// `paragraphs`, `closing`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverLetter {
    pub personal_information: PersonalInfo,
    #[serde(flatten)]
    pub content: Map<String, Value>,
}

impl CoverLetter {
    pub const RECORD: &'static str = "CoverLetter";

    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let map = FieldReader::object(Self::RECORD, raw)?;
        let mut fields = FieldReader::new(map, "");
        let personal_information = fields.personal_information();
        fields.finish(Self::RECORD)?;

        let personal_information = personal_information.ok_or_else(|| {
            ValidationErrors::new(
                Self::RECORD,
                vec![FieldError::new(PERSONAL_INFORMATION, "field required")],
            )
        })?;

        let content = map
            .iter()
            .filter(|(key, _)| key.as_str() != PERSONAL_INFORMATION)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            personal_information,
            content,
        })
    }

    /// An explicit `date` string carried in the letter body, if any.
    pub fn date(&self) -> Option<&str> {
        self.content.get("date").and_then(Value::as_str)
    }
}
