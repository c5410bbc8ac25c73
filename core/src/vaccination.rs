use serde::{Deserialize, Serialize};
use vaxcare_store::KeyedRecord;

pub const VACCINATION_SCHEMA_VERSION: &str = "vaccination@1";

/// Marks an appointment as administered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationLog {
    pub schema_version: String,
    pub date_signature: String,
}

impl VaccinationLog {
    pub fn new(date_signature: impl Into<String>) -> Self {
        Self {
            schema_version: VACCINATION_SCHEMA_VERSION.to_string(),
            date_signature: date_signature.into(),
        }
    }
}

impl KeyedRecord for VaccinationLog {
    const KEY_FIELD: &'static str = "date_signature";

    fn key(&self) -> &str {
        &self.date_signature
    }
}
