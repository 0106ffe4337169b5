//! Half-open UTC time ranges and RFC 3339 timestamp helpers.
//!
//! Two ranges overlap when `a.start < b.end && b.start < a.end`. Adjacent
//! ranges (where one ends exactly when another starts) do NOT overlap.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use crate::error::{Result, SlotError};

/// Parse an RFC 3339 timestamp into `DateTime<Utc>`.
///
/// Any offset is accepted and normalized to UTC.
///
/// # Errors
/// Returns `SlotError::Parse` if `text` is not a valid RFC 3339 date-time.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SlotError::Parse {
            input: text.to_string(),
            reason: e.to_string(),
        })
}

/// Format a timestamp as RFC 3339 with whole seconds and a `Z` suffix,
/// e.g. `2024-01-01T09:00:00Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// A half-open interval `[start, end)` in UTC. Always non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Build a range, rejecting empty or inverted intervals.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidRange` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(SlotError::InvalidRange {
                start: format_timestamp(start),
                end: format_timestamp(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Build a range from endpoints already known to satisfy `start < end`.
    pub(crate) fn from_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start < end);
        Self { start, end }
    }

    /// Parse both endpoints from RFC 3339 text and build a range.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_timestamp(start)?, parse_timestamp(end)?)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        overlaps(self, other)
    }
}

/// Whether two half-open ranges intersect. Touching endpoints do not count.
pub fn overlaps(a: &TimeRange, b: &TimeRange) -> bool {
    a.start < b.end && b.start < a.end
}
