//! Application shell: owns the patient collection, the loading flag and the
//! active tab, and composes the two views.

use std::fmt;
use std::str::FromStr;

use log::{error, info};
use thiserror::Error;

use crate::api::{ApiResult, PatientApi};
use crate::models::{NewRecord, Patient};
use crate::views::{render_patient_list, AddPatientForm, SubmitError, SubmitResult};

/// Shown in place of either view until the initial fetch settles.
pub const LOADING: &str = "Loading patients...";

/// The mutually exclusive UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    View,
    Add,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::View => "View Patients",
            Tab::Add => "Add Patient",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::View => "view",
            Tab::Add => "add",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("unknown tab: {0}")]
pub struct UnknownTab(pub String);

impl FromStr for Tab {
    type Err = UnknownTab;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "view" => Ok(Tab::View),
            "add" => Ok(Tab::Add),
            other => Err(UnknownTab(other.to_string())),
        }
    }
}

/// State shared by the views.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub patients: Vec<Patient>,
    pub loading: bool,
    pub active_tab: Tab,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            patients: Vec::new(),
            loading: true,
            active_tab: Tab::View,
        }
    }
}

impl AppState {
    /// Replace the patient with the same id, or append it.
    pub fn upsert(&mut self, patient: Patient) {
        match self
            .patients
            .iter_mut()
            .find(|p| p.patient_id == patient.patient_id)
        {
            Some(existing) => *existing = patient,
            None => self.patients.push(patient),
        }
    }

    pub fn find(&self, patient_id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.patient_id == patient_id)
    }
}

/// The top-level component.
#[derive(Debug, Default)]
pub struct AppShell {
    state: AppState,
    form: AddPatientForm,
    mounted: bool,
}

impl AppShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the initial fetch. Only the first call does anything.
    ///
    /// Loading ends whether or not the fetch succeeds; a failure leaves the
    /// collection empty.
    pub fn mount(&mut self, api: &dyn PatientApi) {
        if self.mounted {
            return;
        }
        self.mounted = true;

        match api.fetch_patients() {
            Ok(patients) => {
                info!("Loaded {} patients", patients.len());
                // Patients refreshed before the listing arrived are newer.
                let refreshed = std::mem::replace(&mut self.state.patients, patients);
                for patient in refreshed {
                    self.state.upsert(patient);
                }
            }
            Err(e) => error!("Error fetching patients: {}", e),
        }
        self.state.loading = false;
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn patients(&self) -> &[Patient] {
        &self.state.patients
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn active_tab(&self) -> Tab {
        self.state.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.state.active_tab = tab;
    }

    pub fn form(&self) -> &AddPatientForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut AddPatientForm {
        &mut self.form
    }

    /// The form is reachable only once loading is over and its tab is active.
    pub fn form_visible(&self) -> bool {
        !self.state.loading && self.state.active_tab == Tab::Add
    }

    /// Submit the form, appending the new patient on success.
    pub fn submit_form(&mut self, api: &dyn PatientApi) -> SubmitResult<()> {
        if !self.form_visible() {
            return Err(SubmitError::FormHidden);
        }
        let patients = &mut self.state.patients;
        self.form.submit(api, |patient| patients.push(patient))
    }

    /// Re-read one patient from the service and replace the local copy.
    pub fn refresh_patient(&mut self, api: &dyn PatientApi, patient_id: &str) -> ApiResult<()> {
        match api.fetch_patient(patient_id) {
            Ok(patient) => {
                self.state.upsert(patient);
                Ok(())
            }
            Err(e) => {
                error!("Error fetching patient {}: {}", patient_id, e);
                Err(e)
            }
        }
    }

    /// Attach a record on the service, then reconcile that patient.
    ///
    /// Only the record POST decides the result; a failed reconciliation is
    /// logged and leaves the local copy as it was.
    pub fn add_record(
        &mut self,
        api: &dyn PatientApi,
        patient_id: &str,
        record: &NewRecord,
    ) -> ApiResult<()> {
        if let Err(e) = api.add_record(patient_id, record) {
            error!("Error adding record for {}: {}", patient_id, e);
            return Err(e);
        }
        // refresh_patient logs its own failure
        let _ = self.refresh_patient(api, patient_id);
        Ok(())
    }

    /// Render the tab switcher and the active view.
    pub fn render(&self) -> String {
        let mut out = render_tabs(self.state.active_tab);

        if self.state.loading {
            out.push_str(LOADING);
            out.push('\n');
            return out;
        }

        match self.state.active_tab {
            Tab::View => out.push_str(&render_patient_list(&self.state.patients)),
            Tab::Add => out.push_str(&self.form.render()),
        }
        out
    }
}

fn render_tabs(active: Tab) -> String {
    let buttons: Vec<String> = [Tab::View, Tab::Add]
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.title())
            } else {
                format!(" {} ", tab.title())
            }
        })
        .collect();
    let line = buttons.join(" ");
    format!("{}\n{}\n", line, "-".repeat(line.len()))
}
