//! Blocking HTTP implementation of [`PatientApi`].

use std::time::Duration;

use log::debug;
use reqwest::blocking::{Client, Response};
use reqwest::Url;

use super::{ApiError, ApiResult, ClientConfig, CreateAck, PatientApi};
use crate::models::{NewPatient, NewRecord, Patient, PatientDirectory};

/// Talks to the records service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPatientApi {
    client: Client,
    base: Url,
}

impl HttpPatientApi {
    /// Create a client for the service at `config.base_url`.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        // The service is local: no proxy, and calls are never abandoned.
        let client = Client::builder()
            .no_proxy()
            .timeout(None::<Duration>)
            .build()?;

        Ok(Self { client, base })
    }

    /// Client for the default local service.
    pub fn local() -> ApiResult<Self> {
        Self::new(&ClientConfig::default())
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Append path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Turn non-2xx responses into [`ApiError::Status`].
    fn check(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ApiError::from_status(status.as_u16(), &body))
    }
}

impl PatientApi for HttpPatientApi {
    fn fetch_patients(&self) -> ApiResult<Vec<Patient>> {
        let url = self.endpoint(&["patients"]);
        debug!("GET {}", url);

        let response = Self::check(self.client.get(url).send()?)?;
        let bytes = response.bytes()?;
        let directory: PatientDirectory = serde_json::from_slice(&bytes)?;
        Ok(directory.into_patients())
    }

    fn create_patient(&self, patient: &NewPatient) -> ApiResult<CreateAck> {
        let url = self.endpoint(&["patients"]);
        debug!("POST {} ({})", url, patient.patient_id);

        let response = Self::check(self.client.post(url).json(patient).send()?)?;
        let bytes = response.bytes()?;
        Ok(CreateAck::from_body(&bytes))
    }

    fn fetch_patient(&self, patient_id: &str) -> ApiResult<Patient> {
        let url = self.endpoint(&["patients", patient_id]);
        debug!("GET {}", url);

        let response = Self::check(self.client.get(url).send()?)?;
        let bytes = response.bytes()?;
        let mut patient: Patient = serde_json::from_slice(&bytes)?;
        if patient.patient_id.is_empty() {
            patient.patient_id = patient_id.to_string();
        }
        Ok(patient)
    }

    fn add_record(&self, patient_id: &str, record: &NewRecord) -> ApiResult<CreateAck> {
        let url = self.endpoint(&["patients", patient_id, "records"]);
        debug!("POST {}", url);

        let response = Self::check(self.client.post(url).json(record).send()?)?;
        let bytes = response.bytes()?;
        Ok(CreateAck::from_body(&bytes))
    }
}
