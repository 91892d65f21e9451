//! Domain models for the personnel roster.
//!
//! - [`PersonnelRecord`] - a persisted record with its store-assigned id
//! - [`NewPersonnelRecord`] - a candidate record before insertion, built
//!   from a CSV row or a create request
//!
//! Optional string fields use the empty string for "not provided", matching
//! the CSV contract where absent columns read as `""`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Field length limits
// =============================================================================

/// Maximum length of a payroll number.
pub const MAX_PAYROLL_NUMBER: usize = 50;
/// Maximum length of forenames and surname.
pub const MAX_NAME: usize = 100;
/// Maximum length of telephone and mobile numbers.
pub const MAX_PHONE: usize = 20;
/// Maximum length of each address line.
pub const MAX_ADDRESS: usize = 200;
/// Maximum length of a postcode.
pub const MAX_POSTCODE: usize = 20;
/// Maximum length of the home email address.
pub const MAX_EMAIL: usize = 100;

// =============================================================================
// Personnel Record
// =============================================================================

/// A persisted personnel record.
///
/// `id` is the surrogate key assigned by the store; `payroll_number` is the
/// unique business key used for deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRecord {
    /// Store-assigned surrogate id.
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewPersonnelRecord,
}

/// A candidate personnel record, not yet inserted.
///
/// Dates are parsed before construction, so a candidate always carries two
/// valid calendar dates; string completeness is checked separately via
/// [`NewPersonnelRecord::validate`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewPersonnelRecord {
    /// Unique business key, required.
    pub payroll_number: String,
    /// Required.
    pub forenames: String,
    /// Required; the roster lists records in surname order.
    pub surname: String,
    pub date_of_birth: NaiveDate,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub telephone: String,
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub email_home: String,
}

impl NewPersonnelRecord {
    /// Check that all required fields are present after trimming.
    ///
    /// Dates need no check here; a candidate only exists once both parsed.
    pub fn is_complete(&self) -> bool {
        !self.payroll_number.trim().is_empty()
            && !self.forenames.trim().is_empty()
            && !self.surname.trim().is_empty()
    }

    /// Full field validation: completeness plus length limits.
    ///
    /// Returns every violation, not just the first, so callers can report
    /// them all at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !self.is_complete() {
            errors.push("Payroll number, forenames and surname are required".to_string());
        }

        let limits = [
            ("payrollNumber", self.payroll_number.as_str(), MAX_PAYROLL_NUMBER),
            ("forenames", self.forenames.as_str(), MAX_NAME),
            ("surname", self.surname.as_str(), MAX_NAME),
            ("telephone", self.telephone.as_str(), MAX_PHONE),
            ("mobile", self.mobile.as_str(), MAX_PHONE),
            ("address", self.address.as_str(), MAX_ADDRESS),
            ("address2", self.address2.as_str(), MAX_ADDRESS),
            ("postcode", self.postcode.as_str(), MAX_POSTCODE),
        ];
        for (name, value, max) in limits {
            if value.len() > max {
                errors.push(format!("{} exceeds {} characters", name, max));
            }
        }
        if self.email_home.len() > MAX_EMAIL {
            errors.push(format!("emailHome exceeds {} characters", MAX_EMAIL));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Attach a store-assigned id, producing a persisted record.
    pub fn with_id(self, id: i64) -> PersonnelRecord {
        PersonnelRecord { id, fields: self }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewPersonnelRecord {
        NewPersonnelRecord {
            payroll_number: "EMP001".into(),
            forenames: "John".into(),
            surname: "Doe".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            telephone: String::new(),
            mobile: String::new(),
            address: String::new(),
            address2: String::new(),
            postcode: String::new(),
            email_home: String::new(),
        }
    }

    #[test]
    fn test_complete_record_validates() {
        let record = sample();
        assert!(record.is_complete());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_blank_required_field_fails() {
        let mut record = sample();
        record.surname = "   ".into();
        assert!(!record.is_complete());
        let errors = record.validate().unwrap_err();
        assert!(errors[0].contains("required"));
    }

    #[test]
    fn test_length_limit_enforced() {
        let mut record = sample();
        record.payroll_number = "X".repeat(MAX_PAYROLL_NUMBER + 1);
        let errors = record.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("payrollNumber")));
    }

    #[test]
    fn test_serialization_is_camel_case_and_flat() {
        let record = sample().with_id(7);
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"payrollNumber\":\"EMP001\""));
        assert!(json.contains("\"dateOfBirth\":\"1990-01-01\""));
        // flattened: no nested "fields" object
        assert!(!json.contains("\"fields\""));
    }

    #[test]
    fn test_optional_fields_default_on_deserialize() {
        let json = r#"{
            "payrollNumber": "EMP002",
            "forenames": "Jane",
            "surname": "Smith",
            "dateOfBirth": "1985-06-15",
            "startDate": "2021-03-01"
        }"#;
        let record: NewPersonnelRecord = serde_json::from_str(json).unwrap();
        assert!(record.telephone.is_empty());
        assert!(record.validate().is_ok());
    }
}
