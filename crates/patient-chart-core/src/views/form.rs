//! Add-patient form state and submission.

use std::fmt;
use std::str::FromStr;

use log::{error, info};
use thiserror::Error;

use crate::api::{ApiError, PatientApi};
use crate::models::{NewPatient, Patient};

/// One of the three editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Age,
    Gender,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Age, FormField::Gender];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Age => "Age",
            FormField::Gender => "Gender",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown form field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(FormField::Name),
            "age" => Ok(FormField::Age),
            "gender" => Ok(FormField::Gender),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

/// Submission errors.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("{0} is required")]
    MissingField(FormField),

    #[error("Age must be a whole number, got {0:?}")]
    InvalidAge(String),

    #[error("The add patient form is not available")]
    FormHidden,

    #[error("Error adding patient: {0}")]
    Api(#[from] ApiError),
}

pub type SubmitResult<T> = Result<T, SubmitError>;

/// Coerce the age input the way a numeric input would: whole,
/// non-negative numbers only, with `45.0` accepted as `45`.
pub fn parse_age(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(age) = raw.parse::<u32>() {
        return Some(age);
    }

    let value: f64 = raw.parse().ok()?;
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Local state of the add-patient form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddPatientForm {
    name: String,
    age: String,
    gender: String,
}

impl AddPatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text of one field.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Age => self.age = value,
            FormField::Gender => self.gender = value,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Gender => &self.gender,
        }
    }

    /// Whether every field is blank.
    pub fn is_clear(&self) -> bool {
        FormField::ALL.iter().all(|f| self.value(*f).is_empty())
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.age.clear();
        self.gender.clear();
    }

    /// Check required fields and coerce the age. Name and gender are sent
    /// trimmed.
    fn validate(&self) -> SubmitResult<(String, u32, String)> {
        for field in FormField::ALL {
            if self.value(field).trim().is_empty() {
                return Err(SubmitError::MissingField(field));
            }
        }
        let age = parse_age(&self.age).ok_or_else(|| SubmitError::InvalidAge(self.age.clone()))?;
        Ok((
            self.name.trim().to_string(),
            age,
            self.gender.trim().to_string(),
        ))
    }

    /// Create the patient on the service and hand it to `on_add`.
    ///
    /// The id is generated here, before the service sees the request. On
    /// success the fields are cleared; on any failure the form is left as is
    /// and `on_add` is not called.
    pub fn submit<F>(&mut self, api: &dyn PatientApi, on_add: F) -> SubmitResult<()>
    where
        F: FnOnce(Patient),
    {
        let (name, age, gender) = self.validate()?;
        let patient = Patient::new(name, age, gender);

        let ack = match api.create_patient(&NewPatient::from(&patient)) {
            Ok(ack) => ack,
            Err(e) => {
                error!("Error adding patient: {}", e);
                return Err(e.into());
            }
        };

        // Only an echoed entity overrides what was generated locally.
        let added = match ack.into_created() {
            Some(mut stored) => {
                if stored.patient_id.is_empty() {
                    stored.patient_id = patient.patient_id;
                }
                stored
            }
            None => patient,
        };

        info!("Added patient {}", added.patient_id);
        on_add(added);
        self.clear();
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for field in FormField::ALL {
            out.push_str(&format!("{:<7} [{}]\n", format!("{}:", field.label()), self.value(field)));
        }
        out.push_str("[Add Patient]\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("45"), Some(45));
        assert_eq!(parse_age(" 45 "), Some(45));
        assert_eq!(parse_age("45.0"), Some(45));
        assert_eq!(parse_age("0"), Some(0));
        assert_eq!(parse_age("45.5"), None);
        assert_eq!(parse_age("-3"), None);
        assert_eq!(parse_age("forty"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("inf"), None);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("Name".parse::<FormField>(), Ok(FormField::Name));
        assert_eq!(" age".parse::<FormField>(), Ok(FormField::Age));
        assert!("weight".parse::<FormField>().is_err());
    }

    #[test]
    fn test_missing_field_checked_in_order() {
        let mut form = AddPatientForm::new();
        form.set(FormField::Age, "3");
        form.set(FormField::Gender, "F");
        assert!(matches!(
            form.validate(),
            Err(SubmitError::MissingField(FormField::Name))
        ));

        form.set(FormField::Name, "   ");
        assert!(matches!(
            form.validate(),
            Err(SubmitError::MissingField(FormField::Name))
        ));
    }

    #[test]
    fn test_validated_values_are_trimmed() {
        let mut form = AddPatientForm::new();
        form.set(FormField::Name, "  Bob ");
        form.set(FormField::Age, " 45");
        form.set(FormField::Gender, "M  ");

        let (name, age, gender) = form.validate().unwrap();
        assert_eq!(name, "Bob");
        assert_eq!(age, 45);
        assert_eq!(gender, "M");
    }

    #[test]
    fn test_render_shows_values() {
        let mut form = AddPatientForm::new();
        form.set(FormField::Name, "Bob");

        let out = form.render();
        assert!(out.contains("Name:   [Bob]"));
        assert!(out.contains("Age:    []"));
        assert!(out.ends_with("[Add Patient]\n"));
    }

    proptest! {
        #[test]
        fn prop_whole_numbers_parse(age in 0u32..=200) {
            prop_assert_eq!(parse_age(&age.to_string()), Some(age));
            prop_assert_eq!(parse_age(&format!("{}.0", age)), Some(age));
        }

        #[test]
        fn prop_negative_numbers_rejected(age in 1u32..=200) {
            let negative = format!("-{}", age);
            prop_assert_eq!(parse_age(&negative), None);
        }

        #[test]
        fn prop_fractions_rejected(age in 0u32..=200, tenths in 1u32..=9) {
            let input = format!("{}.{}", age, tenths);
            prop_assert_eq!(parse_age(&input), None);
        }
    }
}
