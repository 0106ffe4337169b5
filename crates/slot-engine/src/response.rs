//! The availability response returned to callers.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::timerange::{format_timestamp, TimeRange};

/// A window that satisfied every admissibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailableSlot {
    #[serde(rename = "start_time", serialize_with = "rfc3339")]
    pub start: DateTime<Utc>,
    #[serde(rename = "end_time", serialize_with = "rfc3339")]
    pub end: DateTime<Utc>,
}

impl From<&TimeRange> for AvailableSlot {
    fn from(range: &TimeRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

/// Wire payload: `{"available_slots": [...], "time_taken": "<RFC 3339>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityResponse {
    pub available_slots: Vec<AvailableSlot>,
    /// When the computation ran.
    pub time_taken: String,
}

impl AvailabilityResponse {
    /// Package accepted slots as-is, stamped with `computed_at`.
    pub fn assemble(available_slots: Vec<AvailableSlot>, computed_at: DateTime<Utc>) -> Self {
        Self {
            available_slots,
            time_taken: format_timestamp(computed_at),
        }
    }
}

fn rfc3339<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*ts))
}
