//! Upstream records and the validation pass that turns them into typed ranges.
//!
//! Records arrive with RFC 3339 text timestamps. A record that cannot be used
//! (bad timestamp, empty range, negative quantity, wrong resource) is dropped
//! from the validated set and reported as a [`RecordDiagnostic`], so a single
//! bad record never blocks evaluation of the others.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SlotError;
use crate::timerange::TimeRange;

/// A window in which up to `quantity_capacity` units of a resource are offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingHourRecord {
    #[serde(default)]
    pub id: String,
    pub resource_id: String,
    #[serde(rename = "quantity")]
    pub quantity_capacity: i64,
    pub start_time: String,
    pub end_time: String,
}

/// A window during which the resource is unavailable regardless of capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackoutRecord {
    #[serde(default)]
    pub id: String,
    pub resource_id: String,
    pub start_time: String,
    pub end_time: String,
}

/// A window already consumed by an existing booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationRecord {
    #[serde(default)]
    pub id: String,
    pub resource_id: String,
    #[serde(rename = "quantity")]
    pub quantity_used: i64,
    pub start_time: String,
    pub end_time: String,
}

/// The three record lists fetched for one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default, alias = "business_hours")]
    pub operating_hours: Vec<OperatingHourRecord>,
    #[serde(default, alias = "block_hours")]
    pub blackouts: Vec<BlackoutRecord>,
    #[serde(default, alias = "appointments")]
    pub reservations: Vec<ReservationRecord>,
}

/// An operating-hour record that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    pub range: TimeRange,
    pub capacity: u64,
}

/// A reservation that passed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservedWindow {
    pub range: TimeRange,
    pub quantity: u64,
}

/// Well-formed records, ready for evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidRecords {
    pub operating_hours: Vec<OperatingWindow>,
    pub blackouts: Vec<TimeRange>,
    pub reservations: Vec<ReservedWindow>,
}

/// Which list a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    OperatingHour,
    Blackout,
    Reservation,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::OperatingHour => "operating-hour",
            RecordKind::Blackout => "blackout",
            RecordKind::Reservation => "reservation",
        };
        f.write_str(name)
    }
}

/// Why a record was excluded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum RecordProblem {
    #[error("unparseable timestamp '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: String },

    #[error("start {start} is not before end {end}")]
    EmptyRange { start: String, end: String },

    #[error("negative quantity {quantity}")]
    NegativeQuantity { quantity: i64 },

    #[error("belongs to resource '{found}', expected '{expected}'")]
    ResourceMismatch { expected: String, found: String },
}

/// A record excluded by the validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordDiagnostic {
    pub kind: RecordKind,
    /// Position in the list the record came from.
    pub index: usize,
    pub id: String,
    #[serde(flatten)]
    pub problem: RecordProblem,
}

impl fmt::Display for RecordDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record #{}", self.kind, self.index)?;
        if !self.id.is_empty() {
            write!(f, " ({})", self.id)?;
        }
        write!(f, ": {}", self.problem)
    }
}

/// Output of [`RecordSet::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub records: ValidRecords,
    pub diagnostics: Vec<RecordDiagnostic>,
}

impl RecordSet {
    pub fn is_empty(&self) -> bool {
        self.operating_hours.is_empty() && self.blackouts.is_empty() && self.reservations.is_empty()
    }

    /// Split the records into usable typed windows and diagnostics.
    ///
    /// When `resource_id` is given, records for any other resource are
    /// excluded. Order within each list is preserved.
    pub fn validate(&self, resource_id: Option<&str>) -> Validated {
        let mut out = Validated::default();

        for (index, rec) in self.operating_hours.iter().enumerate() {
            let checked = check_resource(resource_id, &rec.resource_id)
                .and_then(|()| check_quantity(rec.quantity_capacity))
                .and_then(|capacity| {
                    check_range(&rec.start_time, &rec.end_time)
                        .map(|range| OperatingWindow { range, capacity })
                });
            match checked {
                Ok(window) => out.records.operating_hours.push(window),
                Err(problem) => out.reject(RecordKind::OperatingHour, index, &rec.id, problem),
            }
        }

        for (index, rec) in self.blackouts.iter().enumerate() {
            let checked = check_resource(resource_id, &rec.resource_id)
                .and_then(|()| check_range(&rec.start_time, &rec.end_time));
            match checked {
                Ok(range) => out.records.blackouts.push(range),
                Err(problem) => out.reject(RecordKind::Blackout, index, &rec.id, problem),
            }
        }

        for (index, rec) in self.reservations.iter().enumerate() {
            let checked = check_resource(resource_id, &rec.resource_id)
                .and_then(|()| check_quantity(rec.quantity_used))
                .and_then(|quantity| {
                    check_range(&rec.start_time, &rec.end_time)
                        .map(|range| ReservedWindow { range, quantity })
                });
            match checked {
                Ok(window) => out.records.reservations.push(window),
                Err(problem) => out.reject(RecordKind::Reservation, index, &rec.id, problem),
            }
        }

        tracing::debug!(
            operating_hours = out.records.operating_hours.len(),
            blackouts = out.records.blackouts.len(),
            reservations = out.records.reservations.len(),
            skipped = out.diagnostics.len(),
            "validated records"
        );

        out
    }
}

impl Validated {
    fn reject(&mut self, kind: RecordKind, index: usize, id: &str, problem: RecordProblem) {
        let diagnostic = RecordDiagnostic {
            kind,
            index,
            id: id.to_string(),
            problem,
        };
        tracing::warn!(%kind, index, id, "skipping record: {}", diagnostic.problem);
        self.diagnostics.push(diagnostic);
    }
}

fn check_resource(expected: Option<&str>, found: &str) -> Result<(), RecordProblem> {
    match expected {
        Some(expected) if expected != found => Err(RecordProblem::ResourceMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }),
        _ => Ok(()),
    }
}

fn check_quantity(quantity: i64) -> Result<u64, RecordProblem> {
    u64::try_from(quantity).map_err(|_| RecordProblem::NegativeQuantity { quantity })
}

fn check_range(start: &str, end: &str) -> Result<TimeRange, RecordProblem> {
    TimeRange::parse(start, end).map_err(|e| match e {
        SlotError::Parse { input, reason } => RecordProblem::InvalidTimestamp { input, reason },
        SlotError::InvalidRange { start, end } => RecordProblem::EmptyRange { start, end },
        other => RecordProblem::InvalidTimestamp {
            input: format!("{start}/{end}"),
            reason: other.to_string(),
        },
    })
}
