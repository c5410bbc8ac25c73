use pretty_assertions::assert_eq;
use serde_json::json;
use vaxcare_core::ErrorCategory;

use super::{Harness, PHONE, SYS_ID, at};

#[test]
fn appointment_request_errors() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));
    let before = harness.stores.fingerprints().unwrap();

    let cases = [
        (json!({"ContactPhoneNumber": PHONE}), "Bad label PatientSystemID"),
        (
            json!({"PatientSystemID": SYS_ID, "ContactPhoneNumber": PHONE, "Extra": "x"}),
            "Bad label Extra",
        ),
        (
            json!({"PatientSystemID": SYS_ID, "ContactPhoneNumber": 34123456789_u64}),
            "JSON Decode Error - Wrong JSON Format",
        ),
        (
            json!({"PatientSystemID": "72b72255619afeed", "ContactPhoneNumber": PHONE}),
            "patient system id is not valid",
        ),
        (
            json!({"PatientSystemID": SYS_ID, "ContactPhoneNumber": "600000000"}),
            "phone number is not valid",
        ),
    ];

    for (i, (body, message)) in cases.into_iter().enumerate() {
        let input = harness.write_input(&format!("request-{i}.json"), &body);
        let err = manager.get_vaccine_date(&input, "2022-03-18").unwrap_err();
        assert_eq!(err.to_string(), message, "{body}");
    }
    assert_eq!(harness.stores.fingerprints().unwrap(), before);
}

#[test]
fn missing_and_malformed_files() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));

    let err = manager
        .cancel_appointment(&harness.dir.path().join("absent.json"))
        .unwrap_err();
    assert_eq!(err.to_string(), "File is not found");
    assert_eq!(err.category(), ErrorCategory::NotFound);

    let path = harness.dir.path().join("broken.json");
    std::fs::write(&path, "{\"date_signature\": \"abc\"").unwrap();
    let err = manager.cancel_appointment(&path).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Decode);
}

#[test]
fn cancellation_request_field_errors() {
    let harness = Harness::registered();
    let manager = harness.manager(at("2022-03-08"));
    let signature = "e".repeat(64);

    let cases = [
        (
            json!({"date_signature": signature, "cancellation_type": "Final"}),
            "Bad label reason",
        ),
        (
            json!({"date_signature": "E".repeat(64), "cancellation_type": "Final", "reason": "Moving"}),
            "date_signature format is not valid",
        ),
        (
            json!({"date_signature": signature, "cancellation_type": "Forever", "reason": "Moving"}),
            "Cancellation type is not valid",
        ),
        (
            json!({"date_signature": signature, "cancellation_type": "Final", "reason": "Moving 2 Madrid"}),
            "Reason is not valid",
        ),
    ];

    for (i, (body, message)) in cases.into_iter().enumerate() {
        let input = harness.write_input(&format!("cancel-{i}.json"), &body);
        let err = manager.cancel_appointment(&input).unwrap_err();
        assert_eq!(err.to_string(), message, "{body}");
    }
}
