//! Request files: single JSON objects with a fixed set of string keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, VaccineError};

pub const PATIENT_SYSTEM_ID_KEY: &str = "PatientSystemID";
pub const CONTACT_PHONE_NUMBER_KEY: &str = "ContactPhoneNumber";

pub const DATE_SIGNATURE_KEY: &str = "date_signature";
pub const CANCELLATION_TYPE_KEY: &str = "cancellation_type";
pub const REASON_KEY: &str = "reason";

pub const APPOINTMENT_REQUEST_KEYS: [&str; 2] = [PATIENT_SYSTEM_ID_KEY, CONTACT_PHONE_NUMBER_KEY];
pub const CANCELLATION_REQUEST_KEYS: [&str; 3] =
    [DATE_SIGNATURE_KEY, CANCELLATION_TYPE_KEY, REASON_KEY];

/// String values of a request file, keyed by label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFields(BTreeMap<String, String>);

impl InputFields {
    /// Value for `key`. Missing keys are a label error.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| VaccineError::label(key))
    }
}

/// Read `path` and check it holds exactly `keys`, all with string values.
///
/// Expected keys are checked in the order given before unexpected ones, so
/// the reported label is deterministic.
pub fn parse_input(path: &Path, keys: &[&str]) -> Result<InputFields> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "input file not found");
            return Err(VaccineError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(VaccineError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let value: Value = serde_json::from_str(&content).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "input file is not JSON");
        VaccineError::decode_with_source(e)
    })?;
    let Value::Object(object) = value else {
        tracing::warn!(path = %path.display(), "input root is not an object");
        return Err(VaccineError::decode());
    };

    if let Some(missing) = keys.iter().find(|k| !object.contains_key(**k)) {
        return Err(VaccineError::label(*missing));
    }
    if let Some(extra) = object.keys().find(|k| !keys.contains(&k.as_str())) {
        return Err(VaccineError::label(extra.as_str()));
    }

    let mut fields = BTreeMap::new();
    for (key, value) in object {
        let Value::String(text) = value else {
            tracing::warn!(path = %path.display(), key = %key, "input value is not a string");
            return Err(VaccineError::decode());
        };
        fields.insert(key, text);
    }

    tracing::debug!(path = %path.display(), keys = fields.len(), "input parsed");
    Ok(InputFields(fields))
}

/// Raw booking request; fields are validated when the appointment is booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentRequest {
    pub patient_system_id: String,
    pub phone_number: String,
}

impl AppointmentRequest {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let fields = parse_input(path, &APPOINTMENT_REQUEST_KEYS)?;
        Ok(Self {
            patient_system_id: fields.get(PATIENT_SYSTEM_ID_KEY)?.to_string(),
            phone_number: fields.get(CONTACT_PHONE_NUMBER_KEY)?.to_string(),
        })
    }
}
