//! Medical record models.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Shown in place of a record date that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// A dated clinical observation attached to a patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MedicalRecord {
    /// Timestamp as stored by the service
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    /// Presenting symptoms
    #[serde(default, deserialize_with = "lenient_string")]
    pub symptoms: String,
    /// Blood pressure reading
    #[serde(default, deserialize_with = "lenient_text")]
    pub bp: Option<String>,
    /// Temperature reading
    #[serde(default, deserialize_with = "lenient_text")]
    pub temp: Option<String>,
    /// Any additional keys the service stored alongside the record
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl MedicalRecord {
    /// Blood pressure, if one was supplied.
    pub fn blood_pressure(&self) -> Option<&str> {
        self.bp.as_deref().filter(|s| !s.is_empty())
    }

    /// Temperature, if one was supplied.
    pub fn temperature(&self) -> Option<&str> {
        self.temp.as_deref().filter(|s| !s.is_empty())
    }

    /// The record date as `M/D/YYYY`, or [`INVALID_DATE`].
    pub fn display_date(&self) -> String {
        format_record_date(&self.date)
    }
}

/// Request body for `POST /patients/{id}/records`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct NewRecord {
    pub symptoms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_info: BTreeMap<String, String>,
}

impl NewRecord {
    pub fn new(symptoms: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.into(),
            ..Default::default()
        }
    }
}

/// Format a stored timestamp as a short en-US date (`M/D/YYYY`).
///
/// The calendar date is taken as written in the timestamp; no timezone
/// conversion is applied.
pub fn format_record_date(raw: &str) -> String {
    parse_record_date(raw)
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn parse_record_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    // The service writes `str(datetime.now())`, e.g. `2024-03-05 14:02:11.123456`
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Like [`lenient_text`], with null read as an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Accept a JSON string, number or null for an optional text field.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
