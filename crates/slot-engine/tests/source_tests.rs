//! Tests for request validation, record sources and end-to-end computation.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use slot_engine::records::{BlackoutRecord, OperatingHourRecord, ReservationRecord};
use slot_engine::{
    find_availability, AvailabilityResponse, AvailableSlot, EvaluationOptions, InMemorySource,
    RecordSet, RecordSource, SlotError, SlotRequest, TimeRange,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn operating(resource: &str, start: &str, end: &str, capacity: i64) -> OperatingHourRecord {
    OperatingHourRecord {
        id: String::new(),
        resource_id: resource.to_string(),
        quantity_capacity: capacity,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn booking(resource: &str, start: &str, end: &str) -> ReservationRecord {
    ReservationRecord {
        id: String::new(),
        resource_id: resource.to_string(),
        quantity_used: 1,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn sample_source() -> InMemorySource {
    InMemorySource::new(RecordSet {
        operating_hours: vec![
            operating("room-1", "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", 2),
            operating("room-2", "2024-01-01T00:00:00Z", "2024-01-02T00:00:00Z", 2),
        ],
        blackouts: vec![BlackoutRecord {
            id: "maintenance".to_string(),
            resource_id: "room-2".to_string(),
            start_time: "2024-01-01T00:00:00Z".to_string(),
            end_time: "2024-01-02T00:00:00Z".to_string(),
        }],
        reservations: vec![
            booking("room-1", "2024-01-01T09:00:00Z", "2024-01-01T10:00:00Z"),
            booking("room-1", "2024-01-02T09:00:00Z", "2024-01-02T10:00:00Z"),
        ],
    })
}

fn computed_at() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 7, 30, 0).unwrap()
}

/// A source whose reservation listing always fails.
struct FailingSource;

impl RecordSource for FailingSource {
    fn list_operating_hours(
        &self,
        _resource_id: &str,
        _window: &TimeRange,
    ) -> slot_engine::error::Result<Vec<OperatingHourRecord>> {
        Ok(vec![])
    }

    fn list_blackouts(
        &self,
        _resource_id: &str,
        _window: &TimeRange,
    ) -> slot_engine::error::Result<Vec<BlackoutRecord>> {
        Ok(vec![])
    }

    fn list_reservations(
        &self,
        _resource_id: &str,
        _window: &TimeRange,
    ) -> slot_engine::error::Result<Vec<ReservationRecord>> {
        Err(SlotError::UpstreamFetch {
            what: "reservations".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

// ── Request validation ──────────────────────────────────────────────────────

#[test]
fn query_parameters_parse() {
    let req = SlotRequest::from_query("room-1", "2024-01-01", "60", "1").unwrap();
    assert_eq!(req.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(req.duration, Duration::minutes(60));
    assert_eq!(req.quantity, 1);
}

#[test]
fn invalid_query_parameters_are_client_errors() {
    let cases = [
        ("room-1", "01/01/2024", "60", "1"),
        ("room-1", "2024-02-30", "60", "1"),
        ("room-1", "2024-1-1", "60", "1"),
        ("room-1", "24-01-01", "60", "1"),
        ("room-1", " 2024-01-01 ", "60", "1"),
        ("room-1", "+262142-12-31", "60", "1"),
        ("room-1", "2024-01-01T00:00", "60", "1"),
        ("room-1", "2024-01-01", "sixty", "1"),
        ("room-1", "2024-01-01", "0", "1"),
        ("room-1", "2024-01-01", "-15", "1"),
        ("room-1", "2024-01-01", "60", "0"),
        ("room-1", "2024-01-01", "60", "-2"),
        ("room-1", "2024-01-01", "60", "1.5"),
        ("", "2024-01-01", "60", "1"),
    ];
    for (resource, date, duration, quantity) in cases {
        let err = SlotRequest::from_query(resource, date, duration, quantity).unwrap_err();
        assert!(
            matches!(err, SlotError::InvalidInput(_)),
            "expected InvalidInput for {:?}",
            (resource, date, duration, quantity)
        );
        assert!(err.is_client_error());
    }
}

#[test]
fn timestamp_errors_are_client_errors() {
    let err = slot_engine::parse_timestamp("yesterday").unwrap_err();
    assert!(matches!(err, SlotError::Parse { .. }));
    assert!(err.is_client_error());
}

// ── In-memory source ────────────────────────────────────────────────────────

#[test]
fn in_memory_source_filters_by_resource_and_window() {
    let source = sample_source();
    let window = slot_engine::day_bounds(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();

    let bookings = source.list_reservations("room-1", &window).unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].start_time, "2024-01-01T09:00:00Z");

    assert!(source.list_blackouts("room-1", &window).unwrap().is_empty());
    assert_eq!(source.list_operating_hours("room-2", &window).unwrap().len(), 1);
}

// ── End-to-end ──────────────────────────────────────────────────────────────

#[test]
fn find_availability_excludes_the_booked_hour() {
    let request = SlotRequest::from_query("room-1", "2024-01-01", "60", "1").unwrap();

    let report = find_availability(
        &sample_source(),
        &request,
        &EvaluationOptions::default(),
        computed_at(),
    )
    .unwrap();

    assert_eq!(report.response.available_slots.len(), 23);
    assert_eq!(report.response.time_taken, "2024-01-01T07:30:00Z");
    assert!(report.diagnostics.is_empty());
    assert!(!report
        .response
        .available_slots
        .iter()
        .any(|s| s.start == Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()));
}

#[test]
fn find_availability_honours_blackouts_per_resource() {
    let request = SlotRequest::from_query("room-2", "2024-01-01", "30", "1").unwrap();

    let report = find_availability(
        &sample_source(),
        &request,
        &EvaluationOptions::default(),
        computed_at(),
    )
    .unwrap();

    assert!(report.response.available_slots.is_empty());
}

#[test]
fn find_availability_with_huge_duration_is_empty() {
    let request = SlotRequest::from_query("room-1", "2024-01-01", "1000000000000", "1").unwrap();

    let report = find_availability(
        &sample_source(),
        &request,
        &EvaluationOptions::default(),
        computed_at(),
    )
    .unwrap();

    assert!(report.response.available_slots.is_empty());
}

#[test]
fn find_availability_rejects_day_without_following_midnight() {
    let request = SlotRequest::new("room-1", NaiveDate::MAX, Duration::minutes(60), 1).unwrap();

    let err = find_availability(
        &sample_source(),
        &request,
        &EvaluationOptions::default(),
        computed_at(),
    )
    .unwrap_err();

    assert!(matches!(err, SlotError::InvalidInput(_)));
}

#[test]
fn upstream_failure_is_a_server_error() {
    let request = SlotRequest::from_query("room-1", "2024-01-01", "60", "1").unwrap();

    let err = find_availability(
        &FailingSource,
        &request,
        &EvaluationOptions::default(),
        computed_at(),
    )
    .unwrap_err();

    assert!(matches!(err, SlotError::UpstreamFetch { .. }));
    assert!(!err.is_client_error());
}

// ── Response shape ──────────────────────────────────────────────────────────

#[test]
fn response_serializes_to_wire_shape() {
    let slot = AvailableSlot {
        start: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
    };
    let response = AvailabilityResponse::assemble(vec![slot], computed_at());

    let json = serde_json::to_string(&response).unwrap();
    assert_eq!(
        json,
        r#"{"available_slots":[{"start_time":"2024-01-01T09:00:00Z","end_time":"2024-01-01T10:00:00Z"}],"time_taken":"2024-01-01T07:30:00Z"}"#
    );
}

#[test]
fn empty_response_keeps_the_slots_key() {
    let response = AvailabilityResponse::assemble(vec![], computed_at());
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["available_slots"], serde_json::json!([]));
}
