use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FieldError, FieldReader, ValidationErrors};

/// Contact and identity details shown in every document header.
///
/// `date_of_birth` is a display string (DD/MM/YYYY by convention) and is never
/// parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub surname: String,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub zip_code: String,
    pub email: String,
    pub phone: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}

impl PersonalInfo {
    pub const RECORD: &'static str = "PersonalInfo";

    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let map = FieldReader::object(Self::RECORD, raw)?;
        Self::read(FieldReader::new(map, ""))
            .map_err(|errors| ValidationErrors::new(Self::RECORD, errors))
    }

    /// Reads the record out of `fields`, returning the raw field errors so a
    /// parent record can fold them into its own report.
    pub(crate) fn read(mut fields: FieldReader<'_>) -> Result<Self, Vec<FieldError>> {
        let name = fields.required_str("name");
        let surname = fields.required_str("surname");
        let date_of_birth = fields.required_str("date_of_birth");
        let address = fields.required_str("address");
        let city = fields.required_str("city");
        let country = fields.required_str("country");
        let zip_code = fields.required_str("zip_code");
        let email = fields.required_str("email");
        let phone = fields.required_str("phone");
        let linkedin = fields.optional_str("linkedin");
        let github = fields.optional_str("github");

        let errors = fields.into_errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        match (
            name,
            surname,
            date_of_birth,
            address,
            city,
            country,
            zip_code,
            email,
            phone,
        ) {
            (
                Some(name),
                Some(surname),
                Some(date_of_birth),
                Some(address),
                Some(city),
                Some(country),
                Some(zip_code),
                Some(email),
                Some(phone),
            ) => Ok(Self {
                name,
                surname,
                date_of_birth,
                address,
                city,
                country,
                zip_code,
                email,
                phone,
                linkedin,
                github,
            }),
            // every None above was recorded as an error
            _ => Err(vec![FieldError::new("__root__", "incomplete record")]),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures;
    use serde_json::json;

    #[test]
    fn test_valid_personal_info() {
        let info = PersonalInfo::validate(&fixtures::personal_info()).unwrap();
        assert_eq!(info.full_name(), "Jane Doe");
        assert_eq!(info.date_of_birth, "01/02/1990");
        assert!(info.linkedin.is_none());
    }

    #[test]
    fn test_missing_email_is_reported() {
        let mut raw = fixtures::personal_info();
        raw.as_object_mut().unwrap().remove("email");
        let err = PersonalInfo::validate(&raw).unwrap_err();
        assert_eq!(err.errors, vec![FieldError::new("email", "field required")]);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut raw = fixtures::personal_info();
        raw["phone"] = Value::Null;
        let err = PersonalInfo::validate(&raw).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["phone"]);
    }

    #[test]
    fn test_wrong_type_is_not_coerced() {
        let mut raw = fixtures::personal_info();
        raw["zip_code"] = json!(12345);
        let err = PersonalInfo::validate(&raw).unwrap_err();
        assert_eq!(err.errors[0].reason, "input should be a valid string");
    }

    #[test]
    fn test_empty_object_lists_every_required_field() {
        let err = PersonalInfo::validate(&json!({})).unwrap_err();
        assert_eq!(err.errors.len(), 9);
        assert!(err.to_string().contains("9 validation errors for PersonalInfo"));
    }

    #[test]
    fn test_optional_links_and_extras() {
        let mut raw = fixtures::personal_info();
        raw["linkedin"] = json!("https://linkedin.com/in/jane");
        raw["github"] = Value::Null;
        raw["nickname"] = json!("JD");
        let info = PersonalInfo::validate(&raw).unwrap();
        assert_eq!(info.linkedin.as_deref(), Some("https://linkedin.com/in/jane"));
        assert!(info.github.is_none());
    }

    #[test]
    fn test_optional_link_wrong_type() {
        let mut raw = fixtures::personal_info();
        raw["github"] = json!(["jane"]);
        let err = PersonalInfo::validate(&raw).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["github"]);
    }
}
