//! Decide which candidate windows can be offered.
//!
//! A candidate is accepted when at least one operating-hour window contains
//! it, no blackout overlaps it, and the reservation rule admits the requested
//! quantity against that window's capacity. Accepted windows keep candidate
//! order and appear once even when several operating windows match.

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::records::{OperatingWindow, RecordDiagnostic, RecordSet, ValidRecords};
use crate::response::AvailableSlot;
use crate::timerange::TimeRange;

/// How a candidate is matched against an operating-hour window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Containment {
    /// Full timestamp containment: `hours.start <= slot.start && slot.end <= hours.end`.
    #[default]
    Exact,
    /// Compare only the hour-of-day of each endpoint, ignoring date and
    /// minutes: `slot.start.hour >= hours.start.hour && slot.end.hour <= hours.end.hour`.
    ///
    /// A slot ending at midnight has end hour 0 and always passes the end check.
    ///
    /// Hours are read after records are normalized to UTC, so a record
    /// starting at `09:00:00+02:00` counts as hour 7, not hour 9.
    HourOfDay,
}

/// How existing reservations limit a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapacityRule {
    /// Any overlapping reservation removes the candidate; otherwise the raw
    /// capacity must cover the requested quantity.
    #[default]
    Exclusive,
    /// Capacity minus the quantities of all overlapping reservations must
    /// cover the requested quantity.
    Netted,
}

/// Evaluation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    pub containment: Containment,
    pub capacity: CapacityRule,
}

/// Accepted slots plus the records excluded while validating.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub slots: Vec<AvailableSlot>,
    pub diagnostics: Vec<RecordDiagnostic>,
}

/// Filter `candidates` down to the windows that can host `quantity` units.
pub fn evaluate(
    candidates: &[TimeRange],
    records: &ValidRecords,
    quantity: u64,
    options: &EvaluationOptions,
) -> Vec<AvailableSlot> {
    let slots: Vec<AvailableSlot> = candidates
        .iter()
        .filter(|slot| is_admissible(slot, records, quantity, options))
        .map(AvailableSlot::from)
        .collect();

    tracing::debug!(
        candidates = candidates.len(),
        accepted = slots.len(),
        quantity,
        "evaluated candidate windows"
    );

    slots
}

/// Validate `records` and evaluate `candidates` against the usable ones.
///
/// Malformed records never abort evaluation; they are returned in
/// [`Evaluation::diagnostics`].
pub fn evaluate_records(
    candidates: &[TimeRange],
    records: &RecordSet,
    quantity: u64,
    options: &EvaluationOptions,
) -> Evaluation {
    let validated = records.validate(None);
    Evaluation {
        slots: evaluate(candidates, &validated.records, quantity, options),
        diagnostics: validated.diagnostics,
    }
}

fn is_admissible(
    slot: &TimeRange,
    records: &ValidRecords,
    quantity: u64,
    options: &EvaluationOptions,
) -> bool {
    if records.blackouts.iter().any(|b| b.overlaps(slot)) {
        return false;
    }

    let reserved = match options.capacity {
        CapacityRule::Exclusive => {
            if records.reservations.iter().any(|r| r.range.overlaps(slot)) {
                return false;
            }
            0
        }
        CapacityRule::Netted => records
            .reservations
            .iter()
            .filter(|r| r.range.overlaps(slot))
            .fold(0u64, |acc, r| acc.saturating_add(r.quantity)),
    };

    records
        .operating_hours
        .iter()
        .filter(|hours| covers(hours, slot, options.containment))
        .any(|hours| reserved.saturating_add(quantity) <= hours.capacity)
}

fn covers(hours: &OperatingWindow, slot: &TimeRange, containment: Containment) -> bool {
    match containment {
        Containment::Exact => hours.range.contains(slot),
        Containment::HourOfDay => {
            slot.start().hour() >= hours.range.start().hour()
                && slot.end().hour() <= hours.range.end().hour()
        }
    }
}
