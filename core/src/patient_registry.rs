//! Patient registry: binds a patient system id to a registry patient id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vaxcare_store::{KeyedJsonStore, KeyedRecord};

use crate::attribute::{PatientId, PatientSystemId};
use crate::error::{Result, VaccineError};

/// Schema tag for persisted patient bindings.
pub const PATIENT_SCHEMA_VERSION: &str = "patient@1";

/// Resolves patient system ids to registry patient ids.
pub trait PatientRegistry: Send + Sync {
    /// The bound patient id, if the system id is known.
    fn resolve(&self, patient_system_id: &PatientSystemId) -> Result<Option<PatientId>>;

    /// The bound patient id, creating a binding stamped `now` when the
    /// system id is new.
    fn resolve_or_create(
        &self,
        patient_system_id: &PatientSystemId,
        now: DateTime<Utc>,
    ) -> Result<PatientId>;
}

/// One persisted binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub schema_version: String,
    pub patient_system_id: String,
    pub patient_id: String,
    /// RFC 3339 timestamp of registration.
    pub registered_at: String,
}

impl KeyedRecord for PatientRecord {
    const KEY_FIELD: &'static str = "patient_system_id";

    fn key(&self) -> &str {
        &self.patient_system_id
    }
}

/// Registry backed by a keyed JSON store.
#[derive(Debug, Clone)]
pub struct JsonPatientRegistry {
    store: KeyedJsonStore<PatientRecord>,
}

impl JsonPatientRegistry {
    pub fn new(store: KeyedJsonStore<PatientRecord>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &KeyedJsonStore<PatientRecord> {
        &self.store
    }

    /// Bind `patient_system_id` to a known `patient_id`.
    ///
    /// Re-registering the same pair is a no-op; binding an already known
    /// system id to a different patient is a validation failure.
    pub fn register(
        &self,
        patient_system_id: &str,
        patient_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PatientId> {
        let system_id = PatientSystemId::parse(patient_system_id)?;
        let patient_id = PatientId::parse(patient_id)?;

        if let Some(existing) = self.resolve(&system_id)? {
            if existing == patient_id {
                return Ok(existing);
            }
            return Err(VaccineError::validation("patient system id is already registered"));
        }

        self.insert(&system_id, &patient_id, now)?;
        Ok(patient_id)
    }

    fn insert(
        &self,
        system_id: &PatientSystemId,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.store.add(&PatientRecord {
            schema_version: PATIENT_SCHEMA_VERSION.to_string(),
            patient_system_id: system_id.as_str().to_string(),
            patient_id: patient_id.as_str().to_string(),
            registered_at: now.to_rfc3339(),
        })?;
        tracing::info!(
            patient_system_id = %system_id,
            patient_id = %patient_id,
            "patient registered"
        );
        Ok(())
    }
}

impl PatientRegistry for JsonPatientRegistry {
    fn resolve(&self, patient_system_id: &PatientSystemId) -> Result<Option<PatientId>> {
        let Some(record) = self.store.find(patient_system_id.as_str())? else {
            return Ok(None);
        };
        PatientId::parse(&record.patient_id)
            .map(Some)
            .map_err(|_| VaccineError::Integrity)
    }

    fn resolve_or_create(
        &self,
        patient_system_id: &PatientSystemId,
        now: DateTime<Utc>,
    ) -> Result<PatientId> {
        if let Some(id) = self.resolve(patient_system_id)? {
            return Ok(id);
        }
        let id = PatientId::generate();
        self.insert(patient_system_id, &id, now)?;
        Ok(id)
    }
}
