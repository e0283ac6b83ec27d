//! Client side of the patient records service.
//!
//! The service is an external collaborator reached over four endpoints:
//!
//! ```text
//! GET  /patients                 → { patient_id: Patient, ... }
//! POST /patients                 ← { patient_id, name, age, gender }
//! GET  /patients/{id}            → Patient
//! POST /patients/{id}/records    ← { symptoms, bp?, temp?, extra_info? }
//! ```
//!
//! Calls are made once, with no timeout, retry or backoff.

mod http;

pub use http::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{NewPatient, NewRecord, Patient};

/// Address of the local records service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// API errors.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Build a status error from a non-2xx response body.
    ///
    /// The service reports failures as `{"error": "..."}`; other bodies are
    /// kept verbatim.
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        let message = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        };
        ApiError::Status { status, message }
    }

    /// HTTP status, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// What the service answered to a create call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CreateAck {
    /// The service echoed the stored entity; it is authoritative.
    Created(Patient),
    /// Plain acknowledgement, e.g. `{"message": "Patient added successfully"}`.
    Acknowledged {
        #[serde(default)]
        message: Option<String>,
    },
}

impl CreateAck {
    /// Interpret a 2xx response body. Anything unrecognised is a bare ack.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or(CreateAck::Acknowledged { message: None })
    }

    /// The entity the service returned, if any.
    pub fn into_created(self) -> Option<Patient> {
        match self {
            CreateAck::Created(patient) => Some(patient),
            CreateAck::Acknowledged { .. } => None,
        }
    }
}

/// Operations on the patient records service.
pub trait PatientApi {
    /// `GET /patients`, flattened to a sequence in document order.
    fn fetch_patients(&self) -> ApiResult<Vec<Patient>>;

    /// `POST /patients`.
    fn create_patient(&self, patient: &NewPatient) -> ApiResult<CreateAck>;

    /// `GET /patients/{id}`.
    fn fetch_patient(&self, patient_id: &str) -> ApiResult<Patient>;

    /// `POST /patients/{id}/records`.
    fn add_record(&self, patient_id: &str, record: &NewRecord) -> ApiResult<CreateAck>;
}
