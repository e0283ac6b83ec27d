//! Patient Chart Core Library
//!
//! Browse the patients held by a patient records service and register new
//! ones.
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │           AppShell           │
//!                    │  patients · loading · tab    │
//!                    └──────┬────────────────┬──────┘
//!                           │                │
//!               tab = view  ▼                ▼  tab = add
//!                   ┌──────────────┐  ┌────────────────┐
//!                   │ Patient list │  │ AddPatientForm │
//!                   └──────────────┘  └───────┬────────┘
//!                           ▲                 │ submit
//!                     mount │ GET             │ POST
//!                    ┌──────┴─────────────────▼──────┐
//!                    │       PatientApi (HTTP)       │
//!                    └───────────────────────────────┘
//! ```
//!
//! # Core Principle
//!
//! **Log and continue.** A failed call is logged and handed back to the
//! caller; it never tears down state. Loading ends whether the initial fetch
//! succeeds or not, and a failed submission leaves the form as typed.
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, MedicalRecord, PatientDirectory)
//! - [`api`]: The records service client and the `PatientApi` seam
//! - [`views`]: Patient list rendering and the add-patient form
//! - [`app`]: Application shell composing the views

pub mod api;
pub mod app;
pub mod models;
pub mod views;

// Re-export commonly used types
pub use api::{ApiError, ClientConfig, CreateAck, HttpPatientApi, PatientApi, DEFAULT_BASE_URL};
pub use app::{AppShell, AppState, Tab};
pub use models::{MedicalRecord, NewPatient, NewRecord, Patient, PatientDirectory};
pub use views::{AddPatientForm, FormField, SubmitError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PatientChartError {
    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<ApiError> for PatientChartError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::InvalidUrl(_) => PatientChartError::InvalidInput(e.to_string()),
            _ => PatientChartError::ServiceError(e.to_string()),
        }
    }
}

impl From<SubmitError> for PatientChartError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Api(api) => api.into(),
            other => PatientChartError::ValidationError(other.to_string()),
        }
    }
}

impl From<app::UnknownTab> for PatientChartError {
    fn from(e: app::UnknownTab) -> Self {
        PatientChartError::InvalidInput(e.to_string())
    }
}

impl From<views::UnknownField> for PatientChartError {
    fn from(e: views::UnknownField) -> Self {
        PatientChartError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for PatientChartError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        PatientChartError::InternalError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Connect to the records service, defaulting to the local address.
///
/// No request is made until [`PatientChart::mount`].
#[uniffi::export]
pub fn connect(base_url: Option<String>) -> Result<Arc<PatientChart>, PatientChartError> {
    let config = base_url.map(ClientConfig::new).unwrap_or_default();
    let api = HttpPatientApi::new(&config)?;
    Ok(Arc::new(PatientChart {
        api,
        shell: Arc::new(Mutex::new(AppShell::new())),
    }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe application shell for FFI hosts.
#[derive(uniffi::Object)]
pub struct PatientChart {
    api: HttpPatientApi,
    shell: Arc<Mutex<AppShell>>,
}

#[uniffi::export]
impl PatientChart {
    // =========================================================================
    // Shell
    // =========================================================================

    /// Run the initial patient fetch (once).
    pub fn mount(&self) -> Result<(), PatientChartError> {
        let mut shell = self.shell.lock()?;
        shell.mount(&self.api);
        Ok(())
    }

    pub fn is_loading(&self) -> Result<bool, PatientChartError> {
        Ok(self.shell.lock()?.is_loading())
    }

    /// Active tab, `"view"` or `"add"`.
    pub fn active_tab(&self) -> Result<String, PatientChartError> {
        Ok(self.shell.lock()?.active_tab().to_string())
    }

    pub fn select_tab(&self, tab: String) -> Result<(), PatientChartError> {
        let tab: Tab = tab.parse()?;
        self.shell.lock()?.select_tab(tab);
        Ok(())
    }

    /// Full text rendering of the current screen.
    pub fn render(&self) -> Result<String, PatientChartError> {
        Ok(self.shell.lock()?.render())
    }

    // =========================================================================
    // Form
    // =========================================================================

    /// Set `"name"`, `"age"` or `"gender"`.
    pub fn set_form_field(&self, field: String, value: String) -> Result<(), PatientChartError> {
        let field: FormField = field.parse()?;
        self.shell.lock()?.form_mut().set(field, value);
        Ok(())
    }

    pub fn form_values(&self) -> Result<FfiFormValues, PatientChartError> {
        let shell = self.shell.lock()?;
        Ok(FfiFormValues::from(shell.form()))
    }

    /// Submit the add-patient form.
    pub fn submit_form(&self) -> Result<(), PatientChartError> {
        let mut shell = self.shell.lock()?;
        shell.submit_form(&self.api)?;
        Ok(())
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub fn patients(&self) -> Result<Vec<FfiPatient>, PatientChartError> {
        let shell = self.shell.lock()?;
        Ok(shell.patients().iter().cloned().map(FfiPatient::from).collect())
    }

    /// Re-read one patient from the service.
    pub fn refresh_patient(&self, patient_id: String) -> Result<(), PatientChartError> {
        let mut shell = self.shell.lock()?;
        shell.refresh_patient(&self.api, &patient_id)?;
        Ok(())
    }

    /// Attach a medical record to a patient.
    pub fn add_record(
        &self,
        patient_id: String,
        record: FfiNewRecord,
    ) -> Result<(), PatientChartError> {
        let mut shell = self.shell.lock()?;
        shell.add_record(&self.api, &patient_id, &record.into())?;
        Ok(())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub patient_id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub records: Vec<FfiMedicalRecord>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            patient_id: patient.patient_id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            records: patient.records.into_iter().map(|r| r.into()).collect(),
        }
    }
}

/// FFI-safe medical record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicalRecord {
    pub date: String,
    pub display_date: String,
    pub symptoms: String,
    pub bp: Option<String>,
    pub temp: Option<String>,
}

impl From<MedicalRecord> for FfiMedicalRecord {
    fn from(record: MedicalRecord) -> Self {
        Self {
            display_date: record.display_date(),
            bp: record.blood_pressure().map(String::from),
            temp: record.temperature().map(String::from),
            date: record.date,
            symptoms: record.symptoms,
        }
    }
}

/// FFI-safe record submission.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNewRecord {
    pub symptoms: String,
    pub bp: Option<String>,
    pub temp: Option<String>,
    pub extra_info: HashMap<String, String>,
}

impl From<FfiNewRecord> for NewRecord {
    fn from(record: FfiNewRecord) -> Self {
        NewRecord {
            symptoms: record.symptoms,
            bp: record.bp,
            temp: record.temp,
            extra_info: record.extra_info.into_iter().collect(),
        }
    }
}

/// FFI-safe snapshot of the form fields.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormValues {
    pub name: String,
    pub age: String,
    pub gender: String,
}

impl From<&AddPatientForm> for FfiFormValues {
    fn from(form: &AddPatientForm) -> Self {
        Self {
            name: form.value(FormField::Name).to_string(),
            age: form.value(FormField::Age).to_string(),
            gender: form.value(FormField::Gender).to_string(),
        }
    }
}
