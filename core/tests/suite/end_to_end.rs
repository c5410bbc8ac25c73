use pretty_assertions::assert_eq;
use serde_json::json;
use vaxcare_core::{CancellationRequest, CancellationType, StateConflict, VaccineError};

use super::{Harness, OTHER_SYS_ID, PATIENT_ID, PHONE, SYS_ID, at};

#[test]
fn book_cancel_temporal_round_trip() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));

    let appointment = manager.book(SYS_ID, PHONE, 6).unwrap();
    assert_eq!(appointment.patient_id(), PATIENT_ID);
    assert_eq!(appointment.issued_at(), 1_646_697_600.0);
    assert_eq!(appointment.appointment_date(), 1_647_216_000.0);
    manager.persist(&appointment).unwrap();

    let signature = appointment.date_signature().to_string();
    let request =
        CancellationRequest::parse(&signature, "Temporal", "Patient has a fever").unwrap();
    assert_eq!(manager.cancel(&request).unwrap(), signature);

    let stores = manager.stores();
    assert!(!stores.appointments.contains(&signature).unwrap());
    assert!(stores.temporal_cancelled.contains(&signature).unwrap());
    assert!(!stores.final_cancelled.contains(&signature).unwrap());
    let indexed = stores.cancellations.find(&signature).unwrap().unwrap();
    assert_eq!(indexed.cancellation_type, CancellationType::Temporal);
    assert_eq!(indexed.reason, "Patient has a fever");
}

#[test]
fn book_then_vaccinate_on_the_day() {
    let harness = Harness::registered();
    let booking = harness.manager(at("2022-03-08"));
    let appointment = booking.book(SYS_ID, PHONE, 6).unwrap();
    booking.persist(&appointment).unwrap();

    let early = harness.manager(at("2022-03-13"));
    let err = early.vaccine_patient(appointment.date_signature()).unwrap_err();
    assert_eq!(err.conflict(), Some(StateConflict::WrongDate));

    let on_the_day = harness.manager(super::march(14, 16, 30));
    assert!(on_the_day.vaccine_patient(appointment.date_signature()).unwrap());
    assert!(
        harness
            .stores
            .vaccinations
            .contains(appointment.date_signature())
            .unwrap()
    );

    let err = on_the_day
        .vaccine_patient(appointment.date_signature())
        .unwrap_err();
    assert_eq!(err.conflict(), Some(StateConflict::AlreadyAdministered));
}

#[test]
fn get_vaccine_date_books_from_request_file() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));
    let input = harness.write_input(
        "request.json",
        &json!({"PatientSystemID": SYS_ID, "ContactPhoneNumber": PHONE}),
    );

    let signature = manager.get_vaccine_date(&input, "2022-03-18").unwrap();
    let stored = manager.reconstruct(&signature).unwrap();
    assert_eq!(stored.lead_days(), Some(10));
    assert_eq!(stored.scheduled_day().unwrap().to_string(), "2022-03-18");
}

#[test]
fn get_vaccine_date_keeps_calendar_day_mid_afternoon() {
    let harness = Harness::registered();
    let manager = harness.manager(super::march(8, 15, 45));
    let input = harness.write_input(
        "request.json",
        &json!({"PatientSystemID": SYS_ID, "ContactPhoneNumber": PHONE}),
    );

    let signature = manager.get_vaccine_date(&input, "2022-03-09").unwrap();
    let stored = manager.reconstruct(&signature).unwrap();
    assert!(!stored.is_unscheduled());
    assert_eq!(stored.scheduled_day().unwrap().to_string(), "2022-03-09");
}

#[test]
fn get_vaccine_date_rejects_today_and_past() {
    let harness = Harness::new();
    let manager = harness.manager(at("2022-03-08"));
    let input = harness.write_input(
        "request.json",
        &json!({"PatientSystemID": OTHER_SYS_ID, "ContactPhoneNumber": PHONE}),
    );
    let before = harness.stores.fingerprints().unwrap();

    for date in ["2022-03-08", "2022-03-01"] {
        let err = manager.get_vaccine_date(&input, date).unwrap_err();
        assert_eq!(err.conflict(), Some(StateConflict::DateNotInFuture), "{date}");
    }
    let err = manager.get_vaccine_date(&input, "2022-02-30").unwrap_err();
    assert_eq!(err.to_string(), "IsoDate invalid");
    assert_eq!(harness.stores.fingerprints().unwrap(), before);
}

#[test]
fn get_vaccine_date_on_unreadable_store_registers_nobody() {
    let harness = Harness::new();
    let manager = harness.manager(at("2022-03-08"));
    let input = harness.write_input(
        "request.json",
        &json!({"PatientSystemID": OTHER_SYS_ID, "ContactPhoneNumber": PHONE}),
    );
    std::fs::write(harness.stores.appointments.path(), "{\"not\": \"a list\"}").unwrap();
    let before = harness.stores.fingerprints().unwrap();

    let err = manager.get_vaccine_date(&input, "2022-03-18").unwrap_err();
    assert_eq!(err.to_string(), "JSON Decode Error - Wrong JSON Format");
    assert_eq!(harness.stores.fingerprints().unwrap(), before);
    assert!(harness.stores.patients.is_empty().unwrap());
}

#[test]
fn get_vaccine_date_twice_on_the_same_instant_is_already_booked() {
    let harness = Harness::new();
    let manager = harness.manager(super::march(8, 10, 15));
    let input = harness.write_input(
        "request.json",
        &json!({"PatientSystemID": OTHER_SYS_ID, "ContactPhoneNumber": PHONE}),
    );

    manager.get_vaccine_date(&input, "2022-03-18").unwrap();
    let before = harness.stores.fingerprints().unwrap();
    let err = manager.get_vaccine_date(&input, "2022-03-18").unwrap_err();
    assert_eq!(err.conflict(), Some(StateConflict::AlreadyBooked));
    assert_eq!(harness.stores.fingerprints().unwrap(), before);
}

#[test]
fn booking_is_deterministic_under_a_pinned_clock() {
    let harness = Harness::registered();
    let first = harness.manager(super::march(8, 10, 15));
    let second = harness.manager(super::march(8, 10, 15));

    let a = first.book(SYS_ID, PHONE, 6).unwrap();
    let b = second.book(SYS_ID, PHONE, 6).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.date_signature(), b.date_signature());

    let later = harness.manager(super::march(8, 10, 16));
    assert_ne!(later.book(SYS_ID, PHONE, 6).unwrap().date_signature(), a.date_signature());
}

#[test]
fn unknown_patient_is_registered_on_booking() {
    let harness = Harness::new();
    let manager = harness.manager(at("2022-03-08"));
    let appointment = manager.book_and_persist(OTHER_SYS_ID, PHONE, 3).unwrap();

    assert_eq!(harness.stores.patients.len().unwrap(), 1);
    let again = manager.book(OTHER_SYS_ID, PHONE, 4).unwrap();
    assert_eq!(again.patient_id(), appointment.patient_id());
    assert_eq!(harness.stores.patients.len().unwrap(), 1);
}

#[test]
fn vaccine_patient_validates_signature_format() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));
    let err = manager.vaccine_patient("not-a-signature").unwrap_err();
    assert_eq!(err.to_string(), "date_signature format is not valid");

    let err = manager.vaccine_patient(&"f".repeat(64)).unwrap_err();
    assert!(matches!(err, VaccineError::NotFound));
}
