use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequiredField {
    FullName,
    Email,
}

impl RequiredField {
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::FullName => "full name",
            RequiredField::Email => "email",
        }
    }
}

/// Submission blocked by missing required fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", missing_labels(.missing))]
pub struct ValidationError {
    pub missing: Vec<RequiredField>,
}

fn missing_labels(missing: &[RequiredField]) -> String {
    missing
        .iter()
        .map(RequiredField::label)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Name and email must be non-empty. No other field is checked.
pub fn validate_required(record: &ResumeRecord) -> Result<(), ValidationError> {
    let mut missing = Vec::new();
    if record.full_name.is_empty() {
        missing.push(RequiredField::FullName);
    }
    if record.email.is_empty() {
        missing.push(RequiredField::Email);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, email: &str) -> ResumeRecord {
        ResumeRecord {
            full_name: name.to_string(),
            email: email.to_string(),
            ..ResumeRecord::blank()
        }
    }

    #[test]
    fn test_name_and_email_present_passes() {
        assert!(validate_required(&record("Jane Doe", "jane@x.com")).is_ok());
    }

    #[test]
    fn test_other_fields_never_checked() {
        // Phone, location and every section are blank; email format is not inspected.
        assert!(validate_required(&record("J", "not-an-email")).is_ok());
    }

    #[test]
    fn test_missing_email_named() {
        let err = validate_required(&record("Jane Doe", "")).unwrap_err();
        assert_eq!(err.missing, vec![RequiredField::Email]);
        assert_eq!(err.to_string(), "Missing required fields: email");
    }

    #[test]
    fn test_both_missing_named_in_order() {
        let err = validate_required(&record("", "")).unwrap_err();
        assert_eq!(err.missing, vec![RequiredField::FullName, RequiredField::Email]);
        assert_eq!(err.to_string(), "Missing required fields: full name, email");
    }
}
