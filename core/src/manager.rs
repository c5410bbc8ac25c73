//! High-level entry points used by the CLI and by callers driving the
//! system from request files.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::appointment::Appointment;
use crate::attribute::{DateSignature, IsoDate};
use crate::cancellation::{CancellationRequest, CancellationWorkflow};
use crate::clock::{Clock, SystemClock};
use crate::config::VaxcareConfig;
use crate::error::{Result, StateConflict, VaccineError};
use crate::lifecycle::AppointmentLifecycle;
use crate::parser::AppointmentRequest;
use crate::patient_registry::{JsonPatientRegistry, PatientRegistry};
use crate::stores::VaccineStores;

/// Stores, registry and clock bundled behind one API.
#[derive(Clone)]
pub struct VaccineManager {
    stores: VaccineStores,
    registry: Arc<dyn PatientRegistry>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for VaccineManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaccineManager")
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}

impl VaccineManager {
    pub fn new(
        stores: VaccineStores,
        registry: impl PatientRegistry + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            stores,
            registry: Arc::new(registry),
            clock: Arc::new(clock),
        }
    }

    /// JSON-backed registry and wall-clock time.
    pub fn from_config(config: &VaxcareConfig) -> Self {
        let stores = VaccineStores::from_config(config);
        let registry = JsonPatientRegistry::new(stores.patients.clone());
        Self::new(stores, registry, SystemClock)
    }

    /// Replace the clock, keeping stores and registry.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn stores(&self) -> &VaccineStores {
        &self.stores
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    fn lifecycle(&self) -> AppointmentLifecycle<'_> {
        AppointmentLifecycle::new(&self.stores, self.registry.as_ref())
    }

    /// Sign an appointment `lead_days` out from now. Not persisted.
    pub fn book(
        &self,
        patient_system_id: &str,
        phone_number: &str,
        lead_days: u32,
    ) -> Result<Appointment> {
        self.lifecycle()
            .book(patient_system_id, phone_number, lead_days, self.now())
    }

    pub fn persist(&self, appointment: &Appointment) -> Result<()> {
        self.lifecycle().persist(appointment)
    }

    /// Book an appointment `lead_days` out from now and persist it.
    ///
    /// Nothing is written when the booking is refused.
    pub fn book_and_persist(
        &self,
        patient_system_id: &str,
        phone_number: &str,
        lead_days: u32,
    ) -> Result<Appointment> {
        self.lifecycle()
            .book_and_persist(patient_system_id, phone_number, lead_days, self.now())
    }

    /// Load and verify the appointment stored under `date_signature`.
    pub fn reconstruct(&self, date_signature: &str) -> Result<Appointment> {
        let signature = DateSignature::parse(date_signature)?;
        self.lifecycle().reconstruct(signature.as_str())
    }

    pub fn administer(&self, appointment: &Appointment) -> Result<()> {
        self.lifecycle().administer(appointment, self.now())
    }

    pub fn cancel(&self, request: &CancellationRequest) -> Result<String> {
        CancellationWorkflow::new(&self.stores, self.lifecycle()).cancel(request, self.now())
    }

    /// Book and persist an appointment on `date` for the patient in the
    /// request file at `input_path`. Returns the signature.
    pub fn get_vaccine_date(&self, input_path: &Path, date: &str) -> Result<String> {
        let request = AppointmentRequest::from_json_file(input_path)?;
        let date = IsoDate::parse(date)?;

        let now = self.now();
        let today = now.date_naive();
        if date.date() <= today {
            tracing::warn!(date = %date, today = %today, "appointment date not in the future");
            return Err(StateConflict::DateNotInFuture.into());
        }
        let lead_days = u32::try_from((date.date() - today).num_days())
            .map_err(|_| VaccineError::validation("IsoDate invalid"))?;

        let appointment = self.lifecycle().book_and_persist(
            &request.patient_system_id,
            &request.phone_number,
            lead_days,
            now,
        )?;
        Ok(appointment.date_signature().to_string())
    }

    /// Verify the appointment under `date_signature` and record the
    /// vaccination.
    pub fn vaccine_patient(&self, date_signature: &str) -> Result<bool> {
        let appointment = self.reconstruct(date_signature)?;
        self.administer(&appointment)?;
        Ok(true)
    }

    /// Cancel the appointment described by the request file at `input_path`.
    pub fn cancel_appointment(&self, input_path: &Path) -> Result<String> {
        let request = CancellationRequest::from_json_file(input_path)?;
        self.cancel(&request)
    }
}
