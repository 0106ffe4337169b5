//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// A query parameter (date, duration, quantity, resource id) was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// A timestamp was not valid RFC 3339.
    #[error("Invalid timestamp '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A range whose start is not strictly before its end.
    #[error("Invalid range: start {start} is not before end {end}")]
    InvalidRange { start: String, end: String },

    /// One of the upstream record listings failed.
    #[error("Failed to fetch {what}: {reason}")]
    UpstreamFetch { what: String, reason: String },
}

impl SlotError {
    /// Whether the failure was caused by the caller's input (400-class)
    /// rather than by an upstream dependency (500-class).
    ///
    /// `Parse` and `InvalidRange` count as client errors because they only
    /// surface for caller-supplied text, such as an explicit computation
    /// timestamp. Malformed upstream records never become errors; the
    /// validation pass reports them as diagnostics.
    pub fn is_client_error(&self) -> bool {
        match self {
            SlotError::InvalidInput(_)
            | SlotError::InvalidDuration(_)
            | SlotError::Parse { .. }
            | SlotError::InvalidRange { .. } => true,
            SlotError::UpstreamFetch { .. } => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, SlotError>;
