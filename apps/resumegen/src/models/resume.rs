use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FieldError, FieldReader, PersonalInfo, ValidationErrors, PERSONAL_INFORMATION};

/// Section keys in the order the template lays them out.
pub const SECTIONS: [&str; 6] = [
    "education",
    "work_experience",
    "projects",
    "achievements",
    "certifications",
    "additional_skills",
];

/// A resume: personal info plus ordered sections of free-form entries.
///
/// Sections stay `None` when absent from the input; the renderer turns them
/// into empty lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resume {
    pub personal_information: PersonalInfo,
    pub education: Option<Vec<Value>>,
    pub work_experience: Option<Vec<Value>>,
    pub projects: Option<Vec<Value>>,
    pub achievements: Option<Vec<Value>>,
    pub certifications: Option<Vec<Value>>,
    pub additional_skills: Option<Vec<Value>>,
}

impl Resume {
    pub const RECORD: &'static str = "Resume";

    pub fn validate(raw: &Value) -> Result<Self, ValidationErrors> {
        let map = FieldReader::object(Self::RECORD, raw)?;
        let mut fields = FieldReader::new(map, "");

        let personal_information = fields.personal_information();

        let education = fields.optional_list("education");
        let work_experience = fields.optional_list("work_experience");
        let projects = fields.optional_list("projects");
        let achievements = fields.optional_list("achievements");
        let certifications = fields.optional_list("certifications");
        let additional_skills = fields.optional_list("additional_skills");

        fields.finish(Self::RECORD)?;

        let personal_information = personal_information.ok_or_else(|| {
            ValidationErrors::new(
                Self::RECORD,
                vec![FieldError::new(PERSONAL_INFORMATION, "field required")],
            )
        })?;

        Ok(Self {
            personal_information,
            education,
            work_experience,
            projects,
            achievements,
            certifications,
            additional_skills,
        })
    }
}
