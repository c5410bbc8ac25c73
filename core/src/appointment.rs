//! Appointment records and the arithmetic on their instants.
//!
//! Instants are stored as `f64` seconds since the epoch with microsecond
//! precision. All day arithmetic goes through integer microseconds so a
//! stored record always yields the same lead time it was booked with.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use vaxcare_store::KeyedRecord;

use crate::attribute::{PatientId, PatientSystemId, PhoneNumber};
use crate::signature::{self, SignatureFields, UNSCHEDULED};

pub const APPOINTMENT_SCHEMA_VERSION: &str = "appointment@1";

const MICROS_PER_SECOND: f64 = 1_000_000.0;
const MICROS_PER_DAY: i64 = 86_400_000_000;
const SECONDS_PER_DAY: f64 = 86_400.0;
// Comfortably inside i64 and chrono's representable range.
const MAX_ABS_MICROS: f64 = 9.0e18;

/// A signed booking.
///
/// Fields are private: an appointment is either produced by
/// [`Appointment::issue`] or decoded from a store, and decoded records are
/// only trusted after the lifecycle re-derives them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    schema_version: String,
    alg: String,
    typ: String,
    patient_system_id: String,
    patient_id: String,
    phone_number: String,
    issued_at: f64,
    appointment_date: f64,
    date_signature: String,
}

impl KeyedRecord for Appointment {
    const KEY_FIELD: &'static str = "date_signature";

    fn key(&self) -> &str {
        &self.date_signature
    }
}

impl Appointment {
    /// Build and sign an appointment issued at `now`, `lead_days` days out.
    ///
    /// A lead of zero produces the unscheduled sentinel instead of an
    /// appointment instant.
    pub fn issue(
        patient_system_id: &PatientSystemId,
        patient_id: &PatientId,
        phone_number: &PhoneNumber,
        lead_days: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let (issued_at, appointment_date) = instants(lead_days, now);
        let date_signature =
            SignatureFields::new(patient_system_id.as_str(), issued_at, appointment_date).compute();

        Self {
            schema_version: APPOINTMENT_SCHEMA_VERSION.to_string(),
            alg: signature::ALGORITHM.to_string(),
            typ: signature::SIGNATURE_TYPE.to_string(),
            patient_system_id: patient_system_id.as_str().to_string(),
            patient_id: patient_id.as_str().to_string(),
            phone_number: phone_number.as_str().to_string(),
            issued_at,
            appointment_date,
            date_signature,
        }
    }

    /// Signature [`Appointment::issue`] would produce for these inputs.
    ///
    /// The patient id and phone are not signed, so the key of a booking is
    /// known before the patient is resolved.
    pub fn signature_for(
        patient_system_id: &PatientSystemId,
        lead_days: u32,
        now: DateTime<Utc>,
    ) -> String {
        let (issued_at, appointment_date) = instants(lead_days, now);
        SignatureFields::new(patient_system_id.as_str(), issued_at, appointment_date).compute()
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn patient_system_id(&self) -> &str {
        &self.patient_system_id
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn issued_at(&self) -> f64 {
        self.issued_at
    }

    pub fn appointment_date(&self) -> f64 {
        self.appointment_date
    }

    pub fn date_signature(&self) -> &str {
        &self.date_signature
    }

    /// The fields as stored, for recomputing the signature.
    pub fn signature_fields(&self) -> SignatureFields<'_> {
        SignatureFields {
            alg: &self.alg,
            typ: &self.typ,
            patient_system_id: &self.patient_system_id,
            issued_at: self.issued_at,
            appointment_date: self.appointment_date,
        }
    }

    pub fn is_unscheduled(&self) -> bool {
        signature::is_unscheduled(self.appointment_date)
    }

    /// Issuance instant at microsecond precision.
    pub fn issued_instant(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_micros(to_micros(self.issued_at)?)
    }

    /// Whole days between issuance and the appointment, floored.
    ///
    /// Zero for the unscheduled sentinel. `None` when a stored instant is
    /// out of range.
    pub fn lead_days(&self) -> Option<i64> {
        if self.is_unscheduled() {
            return Some(0);
        }
        let delta = to_micros(self.appointment_date)?.checked_sub(to_micros(self.issued_at)?)?;
        Some(delta.div_euclid(MICROS_PER_DAY))
    }

    /// UTC calendar day the appointment falls on.
    ///
    /// Unscheduled appointments fall on their issuance day.
    pub fn scheduled_day(&self) -> Option<NaiveDate> {
        let at = if self.is_unscheduled() {
            self.issued_at
        } else {
            self.appointment_date
        };
        DateTime::from_timestamp_micros(to_micros(at)?).map(|dt| dt.date_naive())
    }

    /// Whether the appointment can no longer be attended at `now`.
    ///
    /// Dated appointments compare instants; unscheduled ones compare days,
    /// so they stay open for the whole issuance day.
    pub fn is_expired(&self, now: DateTime<Utc>) -> Option<bool> {
        if self.is_unscheduled() {
            return Some(self.scheduled_day()? < now.date_naive());
        }
        Some(self.appointment_date < seconds_from_instant(now))
    }
}

fn instants(lead_days: u32, now: DateTime<Utc>) -> (f64, f64) {
    let issued_at = seconds_from_instant(now);
    let appointment_date = if lead_days == 0 {
        UNSCHEDULED
    } else {
        issued_at + f64::from(lead_days) * SECONDS_PER_DAY
    };
    (issued_at, appointment_date)
}

fn seconds_from_instant(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / MICROS_PER_SECOND
}

fn to_micros(seconds: f64) -> Option<i64> {
    let scaled = (seconds * MICROS_PER_SECOND).round();
    (scaled.is_finite() && scaled.abs() < MAX_ABS_MICROS).then_some(scaled as i64)
}
