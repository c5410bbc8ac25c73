//! Configuration loading
//!
//! Loads configuration from `~/.config/vaxcare/config.toml` (or the
//! `VAXCARE_CONFIG` env var). Every field has a default, so a missing file
//! is not an error.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, VaccineError};

/// Root configuration
#[derive(Debug, Deserialize, Clone)]
pub struct VaxcareConfig {
    /// Directory holding every store file
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Store file names, relative to `data_dir`
    #[serde(default)]
    pub stores: StoreFiles,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|d| d.join("vaxcare").to_string_lossy().into_owned())
        .unwrap_or_else(|| "vaxcare-data".to_string())
}

/// File names for each keyed store
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StoreFiles {
    /// Live bookings
    #[serde(default = "default_appointments")]
    pub appointments: String,

    /// Administered vaccinations
    #[serde(default = "default_vaccinations")]
    pub vaccinations: String,

    /// Index of every cancellation
    #[serde(default = "default_cancellations")]
    pub cancellations: String,

    /// Snapshots of temporarily cancelled appointments
    #[serde(default = "default_temporal_cancelled")]
    pub temporal_cancelled: String,

    /// Snapshots of finally cancelled appointments
    #[serde(default = "default_final_cancelled")]
    pub final_cancelled: String,

    /// Patient registry
    #[serde(default = "default_patients")]
    pub patients: String,
}

fn default_appointments() -> String {
    "store_date.json".to_string()
}
fn default_vaccinations() -> String {
    "store_vaccine.json".to_string()
}
fn default_cancellations() -> String {
    "store_cancellation.json".to_string()
}
fn default_temporal_cancelled() -> String {
    "temporal_cancelled_store_date.json".to_string()
}
fn default_final_cancelled() -> String {
    "final_cancelled_store_date.json".to_string()
}
fn default_patients() -> String {
    "store_patient.json".to_string()
}

impl Default for StoreFiles {
    fn default() -> Self {
        Self {
            appointments: default_appointments(),
            vaccinations: default_vaccinations(),
            cancellations: default_cancellations(),
            temporal_cancelled: default_temporal_cancelled(),
            final_cancelled: default_final_cancelled(),
            patients: default_patients(),
        }
    }
}

impl StoreFiles {
    fn named(&self) -> [(&'static str, &str); 6] {
        [
            ("appointments", &self.appointments),
            ("vaccinations", &self.vaccinations),
            ("cancellations", &self.cancellations),
            ("temporal_cancelled", &self.temporal_cancelled),
            ("final_cancelled", &self.final_cancelled),
            ("patients", &self.patients),
        ]
    }
}

impl Default for VaxcareConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            stores: StoreFiles::default(),
        }
    }
}

impl VaxcareConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "VAXCARE_CONFIG";

    /// Environment variable overriding `data_dir`
    pub const ENV_HOME: &'static str = "VAXCARE_HOME";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "config.toml";

    /// Load configuration
    ///
    /// Resolution order:
    /// 1. `explicit` path, if given
    /// 2. `VAXCARE_CONFIG` environment variable
    /// 3. `~/.config/vaxcare/config.toml`
    ///
    /// A missing file yields defaults. `VAXCARE_HOME`, when set, replaces
    /// `data_dir` afterwards.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::resolve_config_path);

        let mut cfg = if path.exists() {
            Self::load_from_path(&path)?
        } else {
            tracing::info!(path = %path.display(), "config not found, using defaults");
            Self::default()
        };

        if let Ok(home) = std::env::var(Self::ENV_HOME)
            && !home.is_empty()
        {
            cfg.data_dir = home;
        }

        Ok(cfg)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VaccineError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: VaxcareConfig = toml::from_str(contents)
            .map_err(|e| VaccineError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Configuration rooted at `data_dir` with default file names
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_string_lossy().into_owned(),
            stores: StoreFiles::default(),
        }
    }

    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("vaxcare")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    fn validate(&self) -> Result<()> {
        let named = self.stores.named();

        if let Some((name, _)) = named.iter().find(|(_, file)| file.trim().is_empty()) {
            return Err(VaccineError::config(format!(
                "store file name for {name} is empty"
            )));
        }

        for (i, (name, file)) in named.iter().enumerate() {
            if let Some((other, _)) = named[i + 1..].iter().find(|(_, f)| f == file) {
                tracing::warn!(
                    first = name,
                    second = other,
                    file,
                    "two stores share one backing file; records will mix"
                );
            }
        }

        Ok(())
    }

    /// The resolved data directory (expanding `~/` if needed)
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(stripped) = self.data_dir.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(stripped);
        }
        PathBuf::from(&self.data_dir)
    }

    /// Absolute path of a store file
    pub fn store_path(&self, file_name: &str) -> PathBuf {
        self.resolved_data_dir().join(file_name)
    }
}
