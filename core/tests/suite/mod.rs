use std::path::PathBuf;

use chrono::TimeZone;
use serde_json::Value;
use tempfile::TempDir;
use vaxcare_core::{FixedClock, JsonPatientRegistry, VaccineManager, VaccineStores};

mod end_to_end;
mod integrity;
mod request_files;

pub const SYS_ID: &str = "72b72255619afeed8bd26a8a2ab5d5b6";
pub const OTHER_SYS_ID: &str = "0123456789abcdef0123456789abcdef";
pub const PATIENT_ID: &str = "78924cb0-075a-4099-a3ee-f3b562e805b9";
pub const PHONE: &str = "+34123456789";

/// Stores in a temp dir plus a registry over them.
pub struct Harness {
    pub dir: TempDir,
    pub stores: VaccineStores,
    pub registry: JsonPatientRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let stores = VaccineStores::in_dir(dir.path());
        let registry = JsonPatientRegistry::new(stores.patients.clone());
        Self {
            dir,
            stores,
            registry,
        }
    }

    /// Harness with `SYS_ID` bound to `PATIENT_ID`.
    pub fn registered() -> Self {
        let harness = Self::new();
        harness
            .registry
            .register(SYS_ID, PATIENT_ID, at("2022-03-01").0)
            .expect("register patient");
        harness
    }

    pub fn manager(&self, clock: FixedClock) -> VaccineManager {
        VaccineManager::new(self.stores.clone(), self.registry.clone(), clock)
    }

    pub fn write_input(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    /// Edit the raw appointments file in place.
    pub fn edit_appointments(&self, edit: impl FnOnce(&mut Value)) {
        let path = self.stores.appointments.path();
        let mut value: Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        edit(&mut value);
        std::fs::write(path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    }
}

/// Clock pinned to midnight UTC of `date`.
pub fn at(date: &str) -> FixedClock {
    FixedClock::at_date(date).expect("valid date")
}

/// Clock pinned to a UTC wall time in March 2022.
pub fn march(day: u32, hour: u32, minute: u32) -> FixedClock {
    FixedClock(
        chrono::Utc
            .with_ymd_and_hms(2022, 3, day, hour, minute, 0)
            .unwrap(),
    )
}
