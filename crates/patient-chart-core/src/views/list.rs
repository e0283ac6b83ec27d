//! Patient list view.

use crate::models::{MedicalRecord, Patient};

/// Shown when the collection is empty.
pub const NO_PATIENTS: &str = "No patients found.";

/// Render every patient as a card, in the order given.
pub fn render_patient_list(patients: &[Patient]) -> String {
    if patients.is_empty() {
        return format!("{}\n", NO_PATIENTS);
    }

    patients
        .iter()
        .map(render_patient_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single patient card.
pub fn render_patient_card(patient: &Patient) -> String {
    let mut card = String::new();

    card.push_str(&format!("== {} ==\n", patient.name));
    card.push_str(&format!("Age: {}\n", patient.age));
    card.push_str(&format!("Gender: {}\n", patient.gender));

    if patient.has_records() {
        card.push_str("Medical Records:\n");
        for record in &patient.records {
            card.push_str(&render_record(record));
        }
    }

    card
}

fn render_record(record: &MedicalRecord) -> String {
    let mut out = String::new();

    out.push_str(&format!("  - Date: {}\n", record.display_date()));
    out.push_str(&format!("    Symptoms: {}\n", record.symptoms));
    if let Some(bp) = record.blood_pressure() {
        out.push_str(&format!("    Blood Pressure: {}\n", bp));
    }
    if let Some(temp) = record.temperature() {
        out.push_str(&format!("    Temperature: {}\n", temp));
    }

    out
}
