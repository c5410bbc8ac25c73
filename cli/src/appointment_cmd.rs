//! Appointment subcommands.

use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use crate::Session;

#[derive(Debug, Parser)]
pub struct BookArgs {
    /// 32-hex patient system id.
    #[arg(long = "patient-system-id")]
    pub patient_system_id: String,

    /// Contact phone, `+34` and nine digits.
    #[arg(long = "phone")]
    pub phone: String,

    /// Days from now; 0 books for today without a fixed time.
    #[arg(long = "lead-days", default_value_t = 0)]
    pub lead_days: u32,
}

#[derive(Debug, Parser)]
pub struct GetDateArgs {
    /// JSON request with `PatientSystemID` and `ContactPhoneNumber`.
    #[arg(long = "input", short = 'i')]
    pub input: PathBuf,

    /// Appointment day, strictly after today.
    #[arg(long = "date", short = 'd')]
    pub date: String,
}

#[derive(Debug, Parser)]
pub struct SignatureArgs {
    /// Appointment signature (64 hex characters).
    #[arg(long = "signature", short = 's')]
    pub signature: String,
}

#[derive(Debug, Parser)]
pub struct CancelArgs {
    /// JSON request with `date_signature`, `cancellation_type` and `reason`.
    #[arg(long = "input", short = 'i')]
    pub input: PathBuf,
}

pub(crate) fn cmd_book(session: &Session, args: &BookArgs) -> anyhow::Result<()> {
    let appointment = session.manager.book_and_persist(
        &args.patient_system_id,
        &args.phone,
        args.lead_days,
    )?;

    session.emit(&serde_json::to_value(&appointment)?, || {
        appointment.date_signature().to_string()
    });
    Ok(())
}

pub(crate) fn cmd_get_date(session: &Session, args: &GetDateArgs) -> anyhow::Result<()> {
    let signature = session.manager.get_vaccine_date(&args.input, &args.date)?;
    session.emit(&json!({ "date_signature": signature }), || signature.clone());
    Ok(())
}

pub(crate) fn cmd_show(session: &Session, args: &SignatureArgs) -> anyhow::Result<()> {
    let appointment = session.manager.reconstruct(&args.signature)?;
    let value = serde_json::to_value(&appointment)?;

    session.emit(&value, || {
        let scheduled = appointment
            .scheduled_day()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string());
        let when = if appointment.is_unscheduled() {
            format!("{scheduled} (no fixed time)")
        } else {
            scheduled
        };
        format!(
            "{}\n  patient:  {} ({})\n  phone:    {}\n  day:      {when}",
            appointment.date_signature(),
            appointment.patient_system_id(),
            appointment.patient_id(),
            appointment.phone_number(),
        )
    });
    Ok(())
}

pub(crate) fn cmd_administer(session: &Session, args: &SignatureArgs) -> anyhow::Result<()> {
    let administered = session.manager.vaccine_patient(&args.signature)?;
    session.emit(
        &json!({ "date_signature": args.signature, "administered": administered }),
        || format!("Vaccine administered: {}", args.signature),
    );
    Ok(())
}

pub(crate) fn cmd_cancel(session: &Session, args: &CancelArgs) -> anyhow::Result<()> {
    let signature = session.manager.cancel_appointment(&args.input)?;
    session.emit(&json!({ "date_signature": signature, "cancelled": true }), || {
        format!("Appointment cancelled: {signature}")
    });
    Ok(())
}
