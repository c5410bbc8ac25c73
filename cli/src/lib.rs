//! `vaxcare` command-line front end.
//!
//! ## Commands
//!
//! - `vaxcare book --patient-system-id <ID> --phone <PHONE> --lead-days <N>`
//! - `vaxcare get-date --input <FILE> --date <YYYY-MM-DD>`
//! - `vaxcare show --signature <SIG>`
//! - `vaxcare administer --signature <SIG>`
//! - `vaxcare cancel --input <FILE>`
//! - `vaxcare fingerprint`
//! - `vaxcare reset`

#![allow(clippy::print_stdout)]

mod appointment_cmd;
mod store_cmd;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use vaxcare_core::{FixedClock, VaccineManager, VaxcareConfig};

pub use appointment_cmd::{BookArgs, CancelArgs, GetDateArgs, SignatureArgs};

#[derive(Debug, Parser)]
#[command(name = "vaxcare", version = vaxcare_core::VERSION, about = "Vaccination appointment stores")]
pub struct Cli {
    /// Config file (defaults to $VAXCARE_CONFIG or ~/.config/vaxcare/config.toml).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the store files; overrides the config.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Pin the clock to midnight UTC of this day (YYYY-MM-DD).
    #[arg(long = "at", global = true)]
    pub at: Option<String>,

    /// Output as JSON.
    #[arg(long = "json", short = 'j', global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Book and persist an appointment N days from now.
    Book(BookArgs),
    /// Book from a request file for a given day.
    GetDate(GetDateArgs),
    /// Print a verified appointment.
    Show(SignatureArgs),
    /// Record the vaccination for today's appointment.
    Administer(SignatureArgs),
    /// Cancel from a request file.
    Cancel(CancelArgs),
    /// Print each store file's SHA-256.
    Fingerprint,
    /// Delete every store file.
    Reset,
}

/// What every command needs: the manager and the output mode.
pub(crate) struct Session {
    pub manager: VaccineManager,
    pub json: bool,
}

impl Session {
    /// Print `value` as pretty JSON, or `text` otherwise.
    pub fn emit(&self, value: &serde_json::Value, text: impl FnOnce() -> String) {
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
            );
        } else {
            println!("{}", text());
        }
    }
}

impl Cli {
    pub fn run(&self) -> anyhow::Result<()> {
        let session = self.session()?;
        match &self.command {
            Command::Book(args) => appointment_cmd::cmd_book(&session, args),
            Command::GetDate(args) => appointment_cmd::cmd_get_date(&session, args),
            Command::Show(args) => appointment_cmd::cmd_show(&session, args),
            Command::Administer(args) => appointment_cmd::cmd_administer(&session, args),
            Command::Cancel(args) => appointment_cmd::cmd_cancel(&session, args),
            Command::Fingerprint => store_cmd::cmd_fingerprint(&session),
            Command::Reset => store_cmd::cmd_reset(&session),
        }
    }

    fn session(&self) -> anyhow::Result<Session> {
        let mut config = VaxcareConfig::load(self.config.as_deref())?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.to_string_lossy().into_owned();
        }
        tracing::debug!(data_dir = %config.resolved_data_dir().display(), "config resolved");

        let mut manager = VaccineManager::from_config(&config);
        if let Some(day) = &self.at {
            let clock = FixedClock::at_date(day)
                .with_context(|| format!("--at expects YYYY-MM-DD, got {day}"))?;
            manager = manager.with_clock(clock);
        }

        Ok(Session {
            manager,
            json: self.json,
        })
    }
}
