//! Store maintenance subcommands.

use serde_json::json;

use crate::Session;

pub(crate) fn cmd_fingerprint(session: &Session) -> anyhow::Result<()> {
    let fingerprints = session.manager.stores().fingerprints()?;
    session.emit(&serde_json::to_value(&fingerprints)?, || {
        [
            ("appointments", &fingerprints.appointments),
            ("vaccinations", &fingerprints.vaccinations),
            ("cancellations", &fingerprints.cancellations),
            ("temporal_cancelled", &fingerprints.temporal_cancelled),
            ("final_cancelled", &fingerprints.final_cancelled),
            ("patients", &fingerprints.patients),
        ]
        .iter()
        .map(|(name, hash)| format!("{name:<20}{hash}"))
        .collect::<Vec<_>>()
        .join("\n")
    });
    Ok(())
}

pub(crate) fn cmd_reset(session: &Session) -> anyhow::Result<()> {
    let stores = session.manager.stores();
    stores.reset()?;
    let dir = stores
        .appointments
        .path()
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    session.emit(&json!({ "reset": true, "data_dir": dir }), || {
        format!("Stores reset under {dir}")
    });
    Ok(())
}
