use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

/// The `date` field of a submission. Only a missing or `null` field is
/// `Unspecified`; any string the client sends is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum MoodDate {
    #[default]
    Unspecified,
    Provided(String),
}

impl From<Option<String>> for MoodDate {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(date) => MoodDate::Provided(date),
            None => MoodDate::Unspecified,
        }
    }
}

impl MoodDate {
    pub fn resolve(self, today: NaiveDate) -> String {
        match self {
            MoodDate::Provided(date) => date,
            MoodDate::Unspecified => today.format("%Y-%m-%d").to_string(),
        }
    }
}

/// POST /mood
#[derive(Debug, Deserialize, Validate)]
pub struct MoodRequest {
    #[validate(custom = "validate_not_blank")]
    pub name: String,

    #[validate(length(min = 1, message = "At least one mood is required"))]
    pub moods: Vec<String>,

    #[serde(default)]
    pub date: MoodDate,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Name is required".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MoodLoggedResponse {
    pub status: &'static str,
    pub message: &'static str,
}

impl MoodLoggedResponse {
    pub fn success() -> Self {
        Self {
            status: "success",
            message: "Mood logged successfully",
        }
    }
}

/// A request that passed validation, with its date resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSubmission {
    pub name: String,
    pub moods: Vec<String>,
    pub date: String,
}

impl MoodSubmission {
    pub fn from_request(request: MoodRequest, today: NaiveDate) -> AppResult<Self> {
        request
            .validate()
            .map_err(|e| AppError::Validation(first_message(&e)))?;

        Ok(Self {
            name: request.name.trim().to_string(),
            moods: request.moods,
            date: request.date.resolve(today),
        })
    }
}

// Field errors come back in a map; report them in declaration order.
fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    ["name", "moods"]
        .iter()
        .filter_map(|field| fields.get(field))
        .flat_map(|errs| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid mood submission".into())
}
