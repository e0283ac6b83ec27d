//! The keyed patient document returned by `GET /patients`.

use std::fmt;

use log::warn;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::patient::Patient;

/// Patients in the order their keys appear in the service's JSON object.
///
/// The service keys patients by id; only the values are kept. A patient body
/// without a `patient_id` takes its map key. Entries that do not decode as a
/// [`Patient`] are skipped so the rest of the listing survives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDirectory(pub Vec<Patient>);

impl PatientDirectory {
    pub fn into_patients(self) -> Vec<Patient> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for PatientDirectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = PatientDirectory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping patient ids to patients")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut patients = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, serde_json::Value>()? {
                    let mut patient = match serde_json::from_value::<Patient>(value) {
                        Ok(patient) => patient,
                        Err(e) => {
                            warn!("Skipping patient {}: {}", key, e);
                            continue;
                        }
                    };
                    if patient.patient_id.is_empty() {
                        patient.patient_id = key;
                    }
                    patients.push(patient);
                }
                Ok(PatientDirectory(patients))
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mapping() {
        let dir: PatientDirectory = serde_json::from_str("{}").unwrap();
        assert!(dir.is_empty());
    }

    #[test]
    fn test_document_order_is_kept() {
        let json = r#"{
            "zz": {"patient_id":"zz","name":"Zed","age":70,"gender":"M","records":[]},
            "aa": {"patient_id":"aa","name":"Ann","age":20,"gender":"F","records":[]}
        }"#;
        let names: Vec<_> = serde_json::from_str::<PatientDirectory>(json)
            .unwrap()
            .into_patients()
            .into_iter()
            .map(|p| p.name)
            .collect();

        assert_eq!(names, vec!["Zed", "Ann"]);
    }

    #[test]
    fn test_key_fills_missing_id() {
        let json = r#"{"legacy-1": {"name":"Old","age":88,"gender":"F"}}"#;
        let dir: PatientDirectory = serde_json::from_str(json).unwrap();
        assert_eq!(dir.0[0].patient_id, "legacy-1");
    }

    #[test]
    fn test_bad_entry_does_not_hide_the_rest() {
        let json = r#"{
            "ann": {"patient_id":"ann","name":"Ann","age":41,"gender":"F","records":[]},
            "ben": {"patient_id":"ben","name":"Ben","age":-3,"gender":"M","records":[]},
            "cy": {"patient_id":"cy","name":"Cy","age":12,"gender":"M","records":[
                {"date":"2024-03-05 10:00:00","symptoms":null,"bp":null,"temp":null}]}
        }"#;
        let dir: PatientDirectory = serde_json::from_str(json).unwrap();
        let names: Vec<_> = dir.0.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Ann", "Cy"]);
        assert_eq!(dir.0[1].records[0].symptoms, "");
    }

    #[test]
    fn test_array_is_rejected() {
        assert!(serde_json::from_str::<PatientDirectory>("[]").is_err());
    }
}
