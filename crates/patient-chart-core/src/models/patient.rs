//! Patient models.

use serde::{Deserialize, Serialize};

use super::record::MedicalRecord;

/// A patient as held by the records service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Client-generated UUID. Older service documents may omit it in the body,
    /// in which case the map key fills it in (see [`super::PatientDirectory`]).
    #[serde(default)]
    pub patient_id: String,
    /// Patient name
    pub name: String,
    /// Age in whole years
    pub age: u32,
    /// Gender, free text
    pub gender: String,
    /// Medical records in the order the service returned them
    #[serde(default)]
    pub records: Vec<MedicalRecord>,
}

impl Patient {
    /// Create a new patient with a freshly generated id and no records.
    pub fn new(name: String, age: u32, gender: String) -> Self {
        Self {
            patient_id: uuid::Uuid::new_v4().to_string(),
            name,
            age,
            gender,
            records: Vec::new(),
        }
    }

    /// Whether any medical records are attached.
    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Request body for `POST /patients`.
///
/// Records are never sent at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPatient {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
}

impl From<&Patient> for NewPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            patient_id: patient.patient_id.clone(),
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender.clone(),
        }
    }
}
