//! Booking, verification and administration of appointments.

use chrono::{DateTime, Utc};

use crate::appointment::Appointment;
use crate::attribute::{PatientId, PatientSystemId, PhoneNumber};
use crate::error::{Result, StateConflict, VaccineError};
use crate::patient_registry::PatientRegistry;
use crate::stores::VaccineStores;
use crate::vaccination::VaccinationLog;

/// Appointment operations over a set of stores and a patient registry.
#[derive(Clone, Copy)]
pub struct AppointmentLifecycle<'a> {
    stores: &'a VaccineStores,
    registry: &'a dyn PatientRegistry,
}

impl<'a> AppointmentLifecycle<'a> {
    pub fn new(stores: &'a VaccineStores, registry: &'a dyn PatientRegistry) -> Self {
        Self { stores, registry }
    }

    /// Validate the request, resolve the patient and sign a new appointment.
    ///
    /// The appointment is not persisted. Resolving an unknown patient
    /// system id registers it.
    pub fn book(
        &self,
        patient_system_id: &str,
        phone_number: &str,
        lead_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Appointment> {
        let system_id = PatientSystemId::parse(patient_system_id)?;
        let phone = PhoneNumber::parse(phone_number)?;
        let patient_id = self.registry.resolve_or_create(&system_id, now)?;

        let appointment = Appointment::issue(&system_id, &patient_id, &phone, lead_days, now);
        tracing::debug!(
            date_signature = appointment.date_signature(),
            patient_id = %patient_id,
            lead_days,
            "appointment signed"
        );
        Ok(appointment)
    }

    /// Append `appointment` to the appointments store.
    pub fn persist(&self, appointment: &Appointment) -> Result<()> {
        let signature = appointment.date_signature();
        if self.stores.appointments.contains(signature)? {
            tracing::warn!(date_signature = signature, "appointment already booked");
            return Err(StateConflict::AlreadyBooked.into());
        }
        self.stores.appointments.add(appointment)?;
        tracing::info!(
            date_signature = signature,
            appointment_date = appointment.appointment_date(),
            "appointment booked"
        );
        Ok(())
    }

    /// Book and persist in one step, reading every store it touches before
    /// writing any of them.
    ///
    /// A refused or failed booking leaves the patient registry untouched;
    /// only an I/O failure on the final append can follow a new binding.
    pub fn book_and_persist(
        &self,
        patient_system_id: &str,
        phone_number: &str,
        lead_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Appointment> {
        let system_id = PatientSystemId::parse(patient_system_id)?;
        PhoneNumber::parse(phone_number)?;

        let signature = Appointment::signature_for(&system_id, lead_days, now);
        if self.stores.appointments.contains(&signature)? {
            tracing::warn!(date_signature = signature, "appointment already booked");
            return Err(StateConflict::AlreadyBooked.into());
        }

        let appointment = self.book(patient_system_id, phone_number, lead_days, now)?;
        self.stores.appointments.add(&appointment)?;
        tracing::info!(
            date_signature = appointment.date_signature(),
            appointment_date = appointment.appointment_date(),
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Load the appointment stored under `date_signature` and re-derive it.
    ///
    /// The stored record is rebuilt from its own fields with the clock
    /// pinned to its issuance instant. Any difference between the rebuilt
    /// and the stored record, or a patient binding that no longer matches
    /// the registry, is an integrity failure. Nothing is written.
    pub fn reconstruct(&self, date_signature: &str) -> Result<Appointment> {
        let Some(stored) = self.stores.appointments.find(date_signature)? else {
            tracing::debug!(date_signature, "appointment not found");
            return Err(VaccineError::NotFound);
        };
        self.verify(&stored)
    }

    fn verify(&self, stored: &Appointment) -> Result<Appointment> {
        let manipulated = || {
            tracing::warn!(
                date_signature = stored.date_signature(),
                "stored appointment failed verification"
            );
            VaccineError::Integrity
        };

        let system_id = PatientSystemId::parse(stored.patient_system_id()).map_err(|_| manipulated())?;
        let phone = PhoneNumber::parse(stored.phone_number()).map_err(|_| manipulated())?;
        let patient_id = PatientId::parse(stored.patient_id()).map_err(|_| manipulated())?;
        let pinned = stored.issued_instant().ok_or_else(manipulated)?;
        let lead_days = stored
            .lead_days()
            .and_then(|days| u32::try_from(days).ok())
            .ok_or_else(manipulated)?;

        let rebuilt = Appointment::issue(&system_id, &patient_id, &phone, lead_days, pinned);
        if rebuilt != *stored {
            return Err(manipulated());
        }

        match self.registry.resolve(&system_id)? {
            Some(bound) if bound == patient_id => {
                tracing::debug!(date_signature = rebuilt.date_signature(), "appointment verified");
                Ok(rebuilt)
            }
            _ => Err(manipulated()),
        }
    }

    /// Record the vaccination for `appointment`, which must fall on today.
    pub fn administer(&self, appointment: &Appointment, now: DateTime<Utc>) -> Result<()> {
        let signature = appointment.date_signature();
        let scheduled = appointment.scheduled_day().ok_or(VaccineError::Integrity)?;
        if scheduled != now.date_naive() {
            tracing::warn!(
                date_signature = signature,
                scheduled = %scheduled,
                today = %now.date_naive(),
                "administration refused"
            );
            return Err(StateConflict::WrongDate.into());
        }
        if self.stores.vaccinations.contains(signature)? {
            tracing::warn!(date_signature = signature, "vaccine already administered");
            return Err(StateConflict::AlreadyAdministered.into());
        }

        self.stores.vaccinations.add(&VaccinationLog::new(signature))?;
        tracing::info!(date_signature = signature, "vaccine administered");
        Ok(())
    }
}
