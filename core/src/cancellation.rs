//! Cancelling appointments.
//!
//! A cancellation removes the live appointment, indexes the cancellation,
//! and archives a snapshot of the appointment in the store matching its
//! cancellation type. Every precondition is checked against the stores as
//! they were before the call; a refused cancellation writes nothing.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vaxcare_store::KeyedRecord;

use crate::attribute::{CancellationType, DateSignature, Reason};
use crate::error::{Result, StateConflict, VaccineError};
use crate::lifecycle::AppointmentLifecycle;
use crate::parser::{self, CANCELLATION_REQUEST_KEYS};
use crate::stores::VaccineStores;

pub const CANCELLATION_SCHEMA_VERSION: &str = "cancellation@1";

/// Entry in the cancellation index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancellation {
    pub schema_version: String,
    pub date_signature: String,
    pub cancellation_type: CancellationType,
    pub reason: String,
}

impl KeyedRecord for Cancellation {
    const KEY_FIELD: &'static str = "date_signature";

    fn key(&self) -> &str {
        &self.date_signature
    }
}

/// A validated request to cancel one appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationRequest {
    pub date_signature: DateSignature,
    pub cancellation_type: CancellationType,
    pub reason: Reason,
}

impl CancellationRequest {
    /// Validate the three fields, in order.
    pub fn parse(date_signature: &str, cancellation_type: &str, reason: &str) -> Result<Self> {
        Ok(Self {
            date_signature: DateSignature::parse(date_signature)?,
            cancellation_type: CancellationType::parse(cancellation_type)?,
            reason: Reason::parse(reason)?,
        })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let fields = parser::parse_input(path, &CANCELLATION_REQUEST_KEYS)?;
        Self::parse(
            fields.get(parser::DATE_SIGNATURE_KEY)?,
            fields.get(parser::CANCELLATION_TYPE_KEY)?,
            fields.get(parser::REASON_KEY)?,
        )
    }

    pub fn to_record(&self) -> Cancellation {
        Cancellation {
            schema_version: CANCELLATION_SCHEMA_VERSION.to_string(),
            date_signature: self.date_signature.as_str().to_string(),
            cancellation_type: self.cancellation_type,
            reason: self.reason.as_str().to_string(),
        }
    }
}

pub struct CancellationWorkflow<'a> {
    stores: &'a VaccineStores,
    lifecycle: AppointmentLifecycle<'a>,
}

impl<'a> CancellationWorkflow<'a> {
    pub fn new(stores: &'a VaccineStores, lifecycle: AppointmentLifecycle<'a>) -> Self {
        Self { stores, lifecycle }
    }

    /// Cancel the appointment named by `request` and return its signature.
    pub fn cancel(&self, request: &CancellationRequest, now: DateTime<Utc>) -> Result<String> {
        let signature = request.date_signature.as_str();

        let appointment = match self.lifecycle.reconstruct(signature) {
            Ok(appointment) => appointment,
            // the live record is gone once cancelled; the index still knows it
            Err(VaccineError::NotFound) if self.stores.cancellations.contains(signature)? => {
                return Err(refuse(signature, StateConflict::AlreadyCancelled));
            }
            Err(e) => return Err(e),
        };

        if appointment.is_expired(now).ok_or(VaccineError::Integrity)? {
            return Err(refuse(signature, StateConflict::Expired));
        }
        if self.stores.vaccinations.contains(signature)? {
            return Err(refuse(signature, StateConflict::AlreadyAdministered));
        }
        if self.stores.cancellations.contains(signature)? {
            return Err(refuse(signature, StateConflict::AlreadyCancelled));
        }

        let snapshot = self.stores.appointments.erase(signature)?;
        self.stores.cancellations.add(&request.to_record())?;
        self.stores
            .terminal(request.cancellation_type)
            .add(&snapshot)?;

        tracing::info!(
            date_signature = signature,
            cancellation_type = %request.cancellation_type,
            "appointment cancelled"
        );
        Ok(signature.to_string())
    }
}

fn refuse(signature: &str, conflict: StateConflict) -> VaccineError {
    tracing::warn!(date_signature = signature, reason = %conflict, "cancellation refused");
    conflict.into()
}
