//! Root of the `vaxcare-core` library.
//!
//! Vaccination appointments are booked against a patient registry, signed
//! with SHA-256 over their identifying fields, and kept in keyed JSON
//! stores. Every read of a stored appointment re-derives it from its own
//! fields, so a record edited on disk is reported rather than trusted.

// Library code reports through tracing and return values only.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod appointment;
pub mod attribute;
pub mod cancellation;
pub mod clock;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod manager;
pub mod parser;
pub mod patient_registry;
pub mod signature;
pub mod stores;
pub mod vaccination;

pub use appointment::Appointment;
pub use attribute::CancellationType;
pub use cancellation::{Cancellation, CancellationRequest};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::VaxcareConfig;
pub use error::{ErrorCategory, Result, StateConflict, VaccineError};
pub use manager::VaccineManager;
pub use patient_registry::{JsonPatientRegistry, PatientRegistry};
pub use stores::{StoreFingerprints, VaccineStores};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
