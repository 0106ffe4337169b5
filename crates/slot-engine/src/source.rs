//! Record sources and the end-to-end availability computation.
//!
//! A [`RecordSource`] stands in for the remote service that lists operating
//! hours, blackouts and reservations for a resource over a time window.
//! [`find_availability`] fetches the three lists for the requested day,
//! validates them, and runs the generator and evaluator.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::evaluator::{evaluate, EvaluationOptions};
use crate::generator::{day_bounds, generate_slots};
use crate::records::{
    BlackoutRecord, OperatingHourRecord, RecordDiagnostic, RecordSet, ReservationRecord,
};
use crate::response::AvailabilityResponse;
use crate::request::SlotRequest;
use crate::timerange::TimeRange;

/// Lists the records relevant to a resource within `window`.
///
/// Implementations report failures as `SlotError::UpstreamFetch`.
pub trait RecordSource {
    fn list_operating_hours(
        &self,
        resource_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<OperatingHourRecord>>;

    fn list_blackouts(&self, resource_id: &str, window: &TimeRange) -> Result<Vec<BlackoutRecord>>;

    fn list_reservations(
        &self,
        resource_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<ReservationRecord>>;
}

/// A [`RecordSource`] backed by an in-memory [`RecordSet`].
///
/// Returns records for the resource whose range intersects the window.
/// Records with unparseable timestamps are returned as-is so the validation
/// pass can report them.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: RecordSet,
}

impl InMemorySource {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }
}

impl From<RecordSet> for InMemorySource {
    fn from(records: RecordSet) -> Self {
        Self::new(records)
    }
}

fn relevant(resource_id: &str, window: &TimeRange, rec_resource: &str, start: &str, end: &str) -> bool {
    if rec_resource != resource_id {
        return false;
    }
    match TimeRange::parse(start, end) {
        Ok(range) => range.overlaps(window),
        Err(_) => true,
    }
}

impl RecordSource for InMemorySource {
    fn list_operating_hours(
        &self,
        resource_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<OperatingHourRecord>> {
        Ok(self
            .records
            .operating_hours
            .iter()
            .filter(|r| relevant(resource_id, window, &r.resource_id, &r.start_time, &r.end_time))
            .cloned()
            .collect())
    }

    fn list_blackouts(&self, resource_id: &str, window: &TimeRange) -> Result<Vec<BlackoutRecord>> {
        Ok(self
            .records
            .blackouts
            .iter()
            .filter(|r| relevant(resource_id, window, &r.resource_id, &r.start_time, &r.end_time))
            .cloned()
            .collect())
    }

    fn list_reservations(
        &self,
        resource_id: &str,
        window: &TimeRange,
    ) -> Result<Vec<ReservationRecord>> {
        Ok(self
            .records
            .reservations
            .iter()
            .filter(|r| relevant(resource_id, window, &r.resource_id, &r.start_time, &r.end_time))
            .cloned()
            .collect())
    }
}

/// The response plus any records that were skipped while computing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub response: AvailabilityResponse,
    pub diagnostics: Vec<RecordDiagnostic>,
}

/// Compute availability for `request` using records from `source`.
///
/// The three lists are fetched for the UTC day of the request. `computed_at`
/// becomes the response's `time_taken`.
///
/// # Errors
/// Propagates the first `SlotError::UpstreamFetch` from `source`. Malformed
/// records are not errors; they are returned in [`Report::diagnostics`].
pub fn find_availability<S: RecordSource + ?Sized>(
    source: &S,
    request: &SlotRequest,
    options: &EvaluationOptions,
    computed_at: DateTime<Utc>,
) -> Result<Report> {
    let window = day_bounds(request.date)?;
    let resource_id = request.resource_id.as_str();

    let records = RecordSet {
        operating_hours: source.list_operating_hours(resource_id, &window)?,
        blackouts: source.list_blackouts(resource_id, &window)?,
        reservations: source.list_reservations(resource_id, &window)?,
    };
    tracing::debug!(
        resource_id,
        date = %request.date,
        operating_hours = records.operating_hours.len(),
        blackouts = records.blackouts.len(),
        reservations = records.reservations.len(),
        "fetched records"
    );

    let validated = records.validate(Some(resource_id));
    let candidates = generate_slots(request.date, request.duration)?;
    let slots = evaluate(&candidates, &validated.records, request.quantity, options);

    Ok(Report {
        response: AvailabilityResponse::assemble(slots, computed_at),
        diagnostics: validated.diagnostics,
    })
}
