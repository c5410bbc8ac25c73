//! Validated field types.
//!
//! Each type can only be built through `parse`, which applies the field's
//! format check and fails with a [`VaccineError::Validation`] naming the
//! field.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VaccineError};

/// A lazily compiled anchored pattern plus the message reported on mismatch.
struct Pattern {
    source: &'static str,
    message: &'static str,
    compiled: OnceLock<Option<Regex>>,
}

impl Pattern {
    const fn new(source: &'static str, message: &'static str) -> Self {
        Self {
            source,
            message,
            compiled: OnceLock::new(),
        }
    }

    fn check(&self, raw: &str) -> Result<()> {
        let compiled = self.compiled.get_or_init(|| match Regex::new(self.source) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = self.source, error = %e, "invalid attribute pattern");
                None
            }
        });

        match compiled {
            Some(re) if re.is_match(raw) => Ok(()),
            _ => Err(VaccineError::validation(self.message)),
        }
    }
}

static PATIENT_SYSTEM_ID: Pattern =
    Pattern::new(r"^[a-f0-9]{32}$", "patient system id is not valid");
static PHONE_NUMBER: Pattern = Pattern::new(r"^\+34[0-9]{9}$", "phone number is not valid");
static DATE_SIGNATURE: Pattern =
    Pattern::new(r"^[a-f0-9]{64}$", "date_signature format is not valid");
static ISO_DATE: Pattern = Pattern::new(
    r"^(20[0-9]{2})-(0[1-9]|1[0-2])-(0[1-9]|1[0-9]|2[0-9]|3[0-1])$",
    "IsoDate invalid",
);
static CANCELLATION_TYPE: Pattern =
    Pattern::new(r"^(Temporal|Final)$", "Cancellation type is not valid");
static REASON: Pattern = Pattern::new(r"^[a-z A-Z]{2,100}$", "Reason is not valid");

const PATIENT_ID_MESSAGE: &str = "patient id is not valid";

macro_rules! string_attribute {
    ($(#[$meta:meta])* $name:ident, $pattern:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn parse(raw: &str) -> Result<Self> {
                $pattern.check(raw)?;
                Ok(Self(raw.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_attribute!(
    /// 32 lowercase hex characters identifying a patient in the health system.
    PatientSystemId,
    PATIENT_SYSTEM_ID
);
string_attribute!(
    /// Spanish mobile number, `+34` followed by nine digits.
    PhoneNumber,
    PHONE_NUMBER
);
string_attribute!(
    /// 64 lowercase hex characters: a SHA-256 appointment signature.
    DateSignature,
    DATE_SIGNATURE
);
string_attribute!(
    /// Free-text cancellation reason, 2 to 100 letters or spaces.
    Reason,
    REASON
);

/// Calendar date in `YYYY-MM-DD`, years 2000 through 2099.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoDate(NaiveDate);

impl IsoDate {
    pub fn parse(raw: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| VaccineError::validation(ISO_DATE.message))?;
        ISO_DATE.check(raw)?;
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Which terminal archive a cancelled appointment goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CancellationType {
    Temporal,
    Final,
}

impl CancellationType {
    pub fn parse(raw: &str) -> Result<Self> {
        CANCELLATION_TYPE.check(raw)?;
        match raw {
            "Temporal" => Ok(Self::Temporal),
            "Final" => Ok(Self::Final),
            _ => Err(VaccineError::validation(CANCELLATION_TYPE.message)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temporal => "Temporal",
            Self::Final => "Final",
        }
    }
}

impl fmt::Display for CancellationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version-4 UUID naming a patient in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId(String);

impl PatientId {
    pub fn parse(raw: &str) -> Result<Self> {
        match uuid::Uuid::parse_str(raw) {
            Ok(id) if id.get_version_num() == 4 && raw.len() == 36 => {
                Ok(Self(id.hyphenated().to_string()))
            }
            _ => Err(VaccineError::validation(PATIENT_ID_MESSAGE)),
        }
    }

    /// A fresh random id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
