//! Error taxonomy for vaccination appointment operations.
//!
//! Display text is part of the observable contract: callers and tests match
//! on the exact messages below.

use std::path::PathBuf;

use thiserror::Error;
use vaxcare_store::StoreError;

/// Error category for structured logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A field failed its format check
    Validation,
    /// Malformed JSON in a store or input file
    Decode,
    /// Well-formed input with missing or unexpected keys
    Label,
    /// A required record or file is absent
    NotFound,
    /// A recomputed signature disagrees with the stored one
    Integrity,
    /// The requested transition conflicts with recorded state
    StateConflict,
    /// Filesystem or configuration failures
    Infrastructure,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::Decode => "DECODE_ERROR",
            Self::Label => "LABEL_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Integrity => "INTEGRITY_ERROR",
            Self::StateConflict => "STATE_CONFLICT",
            Self::Infrastructure => "INFRASTRUCTURE_ERROR",
        }
    }
}

/// Reasons a lifecycle transition is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateConflict {
    #[error("The appointment date has already passed")]
    Expired,

    #[error("The vaccine was already administered")]
    AlreadyAdministered,

    #[error("The appointment was already cancelled")]
    AlreadyCancelled,

    #[error("Today is not the date")]
    WrongDate,

    #[error("The appointment date must be later than today")]
    DateNotInFuture,

    #[error("The appointment was already booked")]
    AlreadyBooked,
}

#[derive(Debug, Error)]
pub enum VaccineError {
    #[error("{message}")]
    Validation { message: String },

    #[error("JSON Decode Error - Wrong JSON Format")]
    Decode {
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Bad label {label}")]
    Label { label: String },

    #[error("File is not found")]
    FileNotFound { path: PathBuf },

    #[error("date_signature is not found")]
    NotFound,

    #[error("Patient's data have been manipulated")]
    Integrity,

    #[error(transparent)]
    Conflict(#[from] StateConflict),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl VaccineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } => ErrorCategory::Validation,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Label { .. } => ErrorCategory::Label,
            Self::FileNotFound { .. } | Self::NotFound => ErrorCategory::NotFound,
            Self::Integrity => ErrorCategory::Integrity,
            Self::Conflict(_) => ErrorCategory::StateConflict,
            Self::Io { .. } | Self::Config { .. } => ErrorCategory::Infrastructure,
        }
    }

    /// Create a validation error carrying the attribute's message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a decode error with no underlying cause
    pub fn decode() -> Self {
        Self::Decode { source: None }
    }

    /// Create a decode error with source
    pub fn decode_with_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Decode {
            source: Some(Box::new(source)),
        }
    }

    /// Create a label error naming the offending key
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label {
            label: label.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The conflict kind, if this is a refused transition.
    pub fn conflict(&self) -> Option<StateConflict> {
        match self {
            Self::Conflict(c) => Some(*c),
            _ => None,
        }
    }
}

impl From<StoreError> for VaccineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Decode { source, .. } => Self::decode_with_source(source),
            StoreError::Encode { source, .. } => Self::decode_with_source(source),
            StoreError::NotFound { .. } => Self::NotFound,
            StoreError::Io { path, source } => Self::Io { path, source },
        }
    }
}

/// Result type for vaccination operations
pub type Result<T> = std::result::Result<T, VaccineError>;
