use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use vaxcare_core::{Appointment, CancellationRequest, VaccineError, VaccineManager};

use super::{Harness, PHONE, SYS_ID};

fn booked(harness: &Harness, lead_days: u32) -> (VaccineManager, Appointment) {
    let manager = harness.manager(super::march(8, 10, 15));
    let appointment = manager.book(SYS_ID, PHONE, lead_days).unwrap();
    manager.persist(&appointment).unwrap();
    (manager, appointment)
}

#[test]
fn stored_field_edits_are_detected() {
    let edits: Vec<(&str, Value)> = vec![
        ("schema_version", json!("appointment@2")),
        ("alg", json!("SHA-512")),
        ("typ", json!("XX")),
        ("patient_system_id", json!(super::OTHER_SYS_ID)),
        ("patient_system_id", json!("not hex")),
        ("patient_id", json!("11111111-2222-4333-8444-555555555555")),
        ("patient_id", json!("garbage")),
        ("phone_number", json!("+44123456789")),
    ];

    for (field, replacement) in edits {
        let harness = Harness::registered();
        let (manager, appointment) = booked(&harness, 6);
        harness.edit_appointments(|v| v[0][field] = replacement.clone());
        let before = harness.stores.fingerprints().unwrap();

        let err = manager.reconstruct(appointment.date_signature()).unwrap_err();
        assert!(matches!(err, VaccineError::Integrity), "{field} = {replacement}");
        assert_eq!(harness.stores.fingerprints().unwrap(), before, "{field}");
    }
}

#[test]
fn instant_edits_are_detected() {
    let bump = |field: &'static str, delta: f64| {
        move |v: &mut Value| {
            let current = v[0][field].as_f64().unwrap();
            v[0][field] = json!(current + delta);
        }
    };

    let harness = Harness::registered();
    let (manager, appointment) = booked(&harness, 6);
    harness.edit_appointments(bump("issued_at", 0.000_001));
    let err = manager.reconstruct(appointment.date_signature()).unwrap_err();
    assert_eq!(err.to_string(), "Patient's data have been manipulated");

    let harness = Harness::registered();
    let (manager, appointment) = booked(&harness, 6);
    harness.edit_appointments(bump("appointment_date", 86_400.0));
    let err = manager.reconstruct(appointment.date_signature()).unwrap_err();
    assert!(matches!(err, VaccineError::Integrity));

    let harness = Harness::registered();
    let (manager, appointment) = booked(&harness, 0);
    harness.edit_appointments(bump("appointment_date", 86_400.0 * 3.0));
    let err = manager.reconstruct(appointment.date_signature()).unwrap_err();
    assert!(matches!(err, VaccineError::Integrity));
}

#[test]
fn forged_signature_key_is_detected() {
    let harness = Harness::registered();
    let (manager, _) = booked(&harness, 6);
    let forged = "c".repeat(64);
    harness.edit_appointments(|v| v[0]["date_signature"] = json!(forged));

    let err = manager.reconstruct(&forged).unwrap_err();
    assert!(matches!(err, VaccineError::Integrity));
}

#[test]
fn tampered_appointment_cannot_be_cancelled_or_administered() {
    let harness = Harness::registered();
    let (_, appointment) = booked(&harness, 0);
    harness.edit_appointments(|v| v[0]["alg"] = json!("MD5"));
    let before = harness.stores.fingerprints().unwrap();

    let manager = harness.manager(super::march(8, 12, 0));
    let request =
        CancellationRequest::parse(appointment.date_signature(), "Final", "Changed mind").unwrap();
    assert!(matches!(
        manager.cancel(&request).unwrap_err(),
        VaccineError::Integrity
    ));
    assert!(matches!(
        manager.vaccine_patient(appointment.date_signature()).unwrap_err(),
        VaccineError::Integrity
    ));
    assert_eq!(harness.stores.fingerprints().unwrap(), before);
}

#[test]
fn corrupted_store_file_is_a_decode_error() {
    let harness = Harness::registered();
    let (manager, appointment) = booked(&harness, 6);
    std::fs::write(harness.stores.appointments.path(), "[{\"date_signature\": ").unwrap();

    let err = manager.reconstruct(appointment.date_signature()).unwrap_err();
    assert_eq!(err.to_string(), "JSON Decode Error - Wrong JSON Format");
}
