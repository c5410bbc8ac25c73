//! Appointment signatures.
//!
//! A signature is the SHA-256 of a fixed canonical string built from the
//! five fields that identify an appointment:
//!
//! ```text
//! {alg:SHA-256,typ:DS,patient_sys_id:<id>,issuedate:<issued>,vaccinationtiondate:<date>}
//! ```
//!
//! The field labels (including `vaccinationtiondate`) and the float
//! rendering are frozen: changing either changes every signature ever
//! issued. Instants render as the shortest round-trip decimal with a
//! trailing `.0` when integral; the unscheduled sentinel renders as `0`.

use sha2::{Digest, Sha256};

/// Hash algorithm tag stored on every appointment.
pub const ALGORITHM: &str = "SHA-256";

/// Type tag stored on every appointment.
pub const SIGNATURE_TYPE: &str = "DS";

/// Appointment instant meaning "no scheduled day".
pub const UNSCHEDULED: f64 = 0.0;

/// The signed fields of an appointment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignatureFields<'a> {
    pub alg: &'a str,
    pub typ: &'a str,
    pub patient_system_id: &'a str,
    /// Seconds since the epoch, microsecond precision.
    pub issued_at: f64,
    /// Seconds since the epoch, or [`UNSCHEDULED`].
    pub appointment_date: f64,
}

impl<'a> SignatureFields<'a> {
    /// Fields with the fixed algorithm and type tags.
    pub fn new(patient_system_id: &'a str, issued_at: f64, appointment_date: f64) -> Self {
        Self {
            alg: ALGORITHM,
            typ: SIGNATURE_TYPE,
            patient_system_id,
            issued_at,
            appointment_date,
        }
    }

    /// The exact preimage that gets hashed.
    pub fn canonical_string(&self) -> String {
        format!(
            "{{alg:{},typ:{},patient_sys_id:{},issuedate:{},vaccinationtiondate:{}}}",
            self.alg,
            self.typ,
            self.patient_system_id,
            render_instant(self.issued_at),
            render_appointment(self.appointment_date),
        )
    }

    /// Lowercase hex SHA-256 of [`Self::canonical_string`].
    pub fn compute(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

fn render_instant(value: f64) -> String {
    // `{:?}` keeps a trailing `.0` on integral floats.
    format!("{value:?}")
}

fn render_appointment(value: f64) -> String {
    if is_unscheduled(value) {
        "0".to_string()
    } else {
        render_instant(value)
    }
}

/// Whether an appointment instant is the unscheduled sentinel.
pub fn is_unscheduled(appointment_date: f64) -> bool {
    appointment_date == UNSCHEDULED
}
