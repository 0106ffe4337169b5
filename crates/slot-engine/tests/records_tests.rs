//! Tests for record deserialization and the validation pass.

use chrono::{TimeZone, Utc};
use slot_engine::records::{RecordKind, RecordProblem};
use slot_engine::RecordSet;

const RECORDS_JSON: &str = r#"{
    "operating_hours": [
        {"id": "oh-1", "resource_id": "room-1", "quantity": 2,
         "start_time": "2024-01-01T08:00:00Z", "end_time": "2024-01-01T18:00:00Z"},
        {"id": "oh-2", "resource_id": "room-1", "quantity": -1,
         "start_time": "2024-01-01T08:00:00Z", "end_time": "2024-01-01T18:00:00Z"}
    ],
    "blackouts": [
        {"id": "bo-1", "resource_id": "room-2",
         "start_time": "2024-01-01T12:00:00Z", "end_time": "2024-01-01T13:00:00Z"}
    ],
    "reservations": [
        {"id": "rs-1", "resource_id": "room-1", "quantity": 1,
         "start_time": "2024-01-01T09:00:00+01:00", "end_time": "2024-01-01T10:00:00+01:00"},
        {"id": "rs-2", "resource_id": "room-1", "quantity": 1,
         "start_time": "2024-01-01 09:00", "end_time": "2024-01-01T10:00:00Z"}
    ]
}"#;

fn records() -> RecordSet {
    serde_json::from_str(RECORDS_JSON).unwrap()
}

#[test]
fn deserializes_wire_field_names() {
    let set = records();
    assert_eq!(set.operating_hours.len(), 2);
    assert_eq!(set.operating_hours[0].quantity_capacity, 2);
    assert_eq!(set.reservations[0].quantity_used, 1);
    assert_eq!(set.blackouts[0].resource_id, "room-2");
}

#[test]
fn accepts_upstream_list_names() {
    let json = r#"{
        "business_hours": [{"resource_id": "r", "quantity": 1,
            "start_time": "2024-01-01T00:00:00Z", "end_time": "2024-01-02T00:00:00Z"}],
        "block_hours": [],
        "appointments": []
    }"#;
    let set: RecordSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.operating_hours.len(), 1);
    assert_eq!(set.operating_hours[0].id, "");
}

#[test]
fn missing_lists_default_to_empty() {
    let set: RecordSet = serde_json::from_str("{}").unwrap();
    assert!(set.is_empty());
}

#[test]
fn validation_keeps_good_records_and_reports_bad_ones() {
    let validated = records().validate(None);

    assert_eq!(validated.records.operating_hours.len(), 1);
    assert_eq!(validated.records.operating_hours[0].capacity, 2);
    assert_eq!(validated.records.blackouts.len(), 1);
    assert_eq!(validated.records.reservations.len(), 1);

    assert_eq!(validated.diagnostics.len(), 2);
    assert_eq!(validated.diagnostics[0].kind, RecordKind::OperatingHour);
    assert_eq!(validated.diagnostics[0].id, "oh-2");
    assert_eq!(
        validated.diagnostics[0].problem,
        RecordProblem::NegativeQuantity { quantity: -1 }
    );
    assert_eq!(validated.diagnostics[1].kind, RecordKind::Reservation);
    assert_eq!(validated.diagnostics[1].index, 1);
    assert!(matches!(
        validated.diagnostics[1].problem,
        RecordProblem::InvalidTimestamp { .. }
    ));
}

#[test]
fn offsets_are_normalized_to_utc() {
    let validated = records().validate(None);
    let booking = validated.records.reservations[0].range;
    assert_eq!(
        booking.start(),
        Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
    );
}

#[test]
fn other_resources_are_reported_when_filtering() {
    let validated = records().validate(Some("room-1"));

    assert!(validated.records.blackouts.is_empty());
    assert!(validated.diagnostics.iter().any(|d| d.kind == RecordKind::Blackout
        && d.problem
            == RecordProblem::ResourceMismatch {
                expected: "room-1".to_string(),
                found: "room-2".to_string(),
            }));
}

#[test]
fn diagnostic_display_names_the_record() {
    let validated = records().validate(None);
    let text = validated.diagnostics[0].to_string();
    assert_eq!(text, "operating-hour record #1 (oh-2): negative quantity -1");
}

#[test]
fn diagnostics_serialize_with_problem_tag() {
    let validated = records().validate(None);
    let value = serde_json::to_value(&validated.diagnostics[0]).unwrap();
    assert_eq!(value["kind"], "operating_hour");
    assert_eq!(value["problem"], "negative_quantity");
    assert_eq!(value["quantity"], -1);
}
