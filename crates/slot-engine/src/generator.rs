//! Enumerate fixed-size candidate windows across a UTC calendar day.
//!
//! Windows are back-to-back starting at midnight. Only windows that end at or
//! before the following midnight are produced, so a trailing partial window is
//! dropped.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::{Result, SlotError};
use crate::timerange::TimeRange;

/// The `[midnight, midnight + 24h)` range for `day` in UTC.
///
/// # Errors
/// Returns `SlotError::InvalidInput` for a day at the edge of the
/// representable range, where the following midnight does not exist.
pub fn day_bounds(day: NaiveDate) -> Result<TimeRange> {
    let day_start: DateTime<Utc> = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let day_end = day_start
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| SlotError::InvalidInput(format!("date {day} is out of range")))?;
    Ok(TimeRange::from_ordered(day_start, day_end))
}

/// Generate the candidate windows of exactly `duration` for `day`.
///
/// For a duration longer than a day the result is empty.
///
/// # Errors
/// Returns `SlotError::InvalidDuration` if `duration` is zero or negative,
/// and `SlotError::InvalidInput` if `day` has no following midnight.
pub fn generate_slots(day: NaiveDate, duration: Duration) -> Result<Vec<TimeRange>> {
    if duration <= Duration::zero() {
        return Err(SlotError::InvalidDuration(format!(
            "duration must be positive, got {} seconds",
            duration.num_seconds()
        )));
    }

    let bounds = day_bounds(day)?;
    if duration > bounds.duration() {
        return Ok(Vec::new());
    }

    let mut slots = Vec::new();
    let mut cursor = bounds.start();

    while let Some(end) = cursor.checked_add_signed(duration) {
        if end > bounds.end() {
            break;
        }
        // duration > 0, so cursor < end.
        slots.push(TimeRange::from_ordered(cursor, end));
        cursor = end;
    }

    Ok(slots)
}
