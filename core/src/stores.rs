//! The set of keyed stores one deployment works against.

use std::path::Path;

use serde::Serialize;
use vaxcare_store::KeyedJsonStore;

use crate::appointment::Appointment;
use crate::attribute::CancellationType;
use crate::cancellation::Cancellation;
use crate::config::VaxcareConfig;
use crate::error::Result;
use crate::patient_registry::PatientRecord;
use crate::vaccination::VaccinationLog;

/// Handles on every store file. Cloning is cheap and clones agree.
#[derive(Debug, Clone)]
pub struct VaccineStores {
    /// Live bookings
    pub appointments: KeyedJsonStore<Appointment>,
    /// Administered vaccinations
    pub vaccinations: KeyedJsonStore<VaccinationLog>,
    /// Every cancellation, whatever its type
    pub cancellations: KeyedJsonStore<Cancellation>,
    /// Snapshots of temporarily cancelled appointments
    pub temporal_cancelled: KeyedJsonStore<Appointment>,
    /// Snapshots of finally cancelled appointments
    pub final_cancelled: KeyedJsonStore<Appointment>,
    pub patients: KeyedJsonStore<PatientRecord>,
}

/// SHA-256 of each store file's bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreFingerprints {
    pub appointments: String,
    pub vaccinations: String,
    pub cancellations: String,
    pub temporal_cancelled: String,
    pub final_cancelled: String,
    pub patients: String,
}

impl VaccineStores {
    pub fn from_config(config: &VaxcareConfig) -> Self {
        let files = &config.stores;
        Self {
            appointments: KeyedJsonStore::new(config.store_path(&files.appointments)),
            vaccinations: KeyedJsonStore::new(config.store_path(&files.vaccinations)),
            cancellations: KeyedJsonStore::new(config.store_path(&files.cancellations)),
            temporal_cancelled: KeyedJsonStore::new(
                config.store_path(&files.temporal_cancelled),
            ),
            final_cancelled: KeyedJsonStore::new(config.store_path(&files.final_cancelled)),
            patients: KeyedJsonStore::new(config.store_path(&files.patients)),
        }
    }

    /// Stores under `data_dir` with the default file names.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::from_config(&VaxcareConfig::with_data_dir(data_dir))
    }

    /// The archive a cancellation of `kind` lands in.
    pub fn terminal(&self, kind: CancellationType) -> &KeyedJsonStore<Appointment> {
        match kind {
            CancellationType::Temporal => &self.temporal_cancelled,
            CancellationType::Final => &self.final_cancelled,
        }
    }

    pub fn fingerprints(&self) -> Result<StoreFingerprints> {
        Ok(StoreFingerprints {
            appointments: self.appointments.content_fingerprint()?,
            vaccinations: self.vaccinations.content_fingerprint()?,
            cancellations: self.cancellations.content_fingerprint()?,
            temporal_cancelled: self.temporal_cancelled.content_fingerprint()?,
            final_cancelled: self.final_cancelled.content_fingerprint()?,
            patients: self.patients.content_fingerprint()?,
        })
    }

    /// Delete every backing file.
    pub fn reset(&self) -> Result<()> {
        self.appointments.delete_backing_file()?;
        self.vaccinations.delete_backing_file()?;
        self.cancellations.delete_backing_file()?;
        self.temporal_cancelled.delete_backing_file()?;
        self.final_cancelled.delete_backing_file()?;
        self.patients.delete_backing_file()?;
        tracing::info!(
            data_dir = %self.appointments.path().parent().unwrap_or(Path::new("")).display(),
            "stores reset"
        );
        Ok(())
    }
}
