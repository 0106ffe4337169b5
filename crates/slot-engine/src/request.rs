//! Validation of raw query parameters into a [`SlotRequest`].

use chrono::{Duration, NaiveDate};

use crate::error::{Result, SlotError};

/// Query parameters driving one availability computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRequest {
    pub resource_id: String,
    pub date: NaiveDate,
    /// Always positive.
    pub duration: Duration,
    /// Always at least 1.
    pub quantity: u64,
}

impl SlotRequest {
    /// Build a request from already-typed values.
    ///
    /// # Errors
    /// Returns `SlotError::InvalidInput` for an empty resource id, a
    /// non-positive duration, or a zero quantity.
    pub fn new(
        resource_id: impl Into<String>,
        date: NaiveDate,
        duration: Duration,
        quantity: u64,
    ) -> Result<Self> {
        let resource_id = resource_id.into();
        if resource_id.trim().is_empty() {
            return Err(SlotError::InvalidInput("resourceId must not be empty".to_string()));
        }
        if duration <= Duration::zero() {
            return Err(SlotError::InvalidInput(
                "duration must be a positive number of minutes".to_string(),
            ));
        }
        if quantity == 0 {
            return Err(SlotError::InvalidInput(
                "quantity must be a positive integer".to_string(),
            ));
        }
        Ok(Self {
            resource_id,
            date,
            duration,
            quantity,
        })
    }

    /// Parse the `resourceId`, `date`, `duration` and `quantity` query values.
    ///
    /// `date` is exactly `YYYY-MM-DD`, `duration` is whole minutes.
    pub fn from_query(resource_id: &str, date: &str, duration: &str, quantity: &str) -> Result<Self> {
        let invalid_date = || SlotError::InvalidInput(format!("invalid date '{date}', use YYYY-MM-DD"));
        if !is_calendar_date_shape(date) {
            return Err(invalid_date());
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid_date())?;

        let minutes: i64 = duration
            .trim()
            .parse()
            .map_err(|_| SlotError::InvalidInput(format!("invalid duration '{duration}'")))?;
        let duration = Duration::try_minutes(minutes)
            .ok_or_else(|| SlotError::InvalidInput(format!("duration '{minutes}' out of range")))?;

        let quantity: u64 = quantity
            .trim()
            .parse()
            .map_err(|_| SlotError::InvalidInput(format!("invalid quantity '{quantity}'")))?;

        Self::new(resource_id, date, duration, quantity)
    }
}

/// `DDDD-DD-DD` with ASCII digits and nothing else. chrono's `%Y` also
/// accepts signed or unpadded years.
fn is_calendar_date_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}
