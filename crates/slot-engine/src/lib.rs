//! # slot-engine
//!
//! Deterministic slot availability for a resource on a UTC calendar day.
//!
//! Given operating hours, blackout windows and existing reservations, the
//! engine enumerates fixed-size candidate windows across the day and keeps
//! those that can host the requested quantity. No I/O happens here; records
//! are supplied by the caller or through a [`RecordSource`].
//!
//! ## Modules
//!
//! - [`timerange`] — RFC 3339 parse/format, half-open `TimeRange`, overlap
//! - [`generator`] — Candidate windows across a day
//! - [`records`] — Upstream records and the validation pass
//! - [`evaluator`] — Admissibility of candidates against the records
//! - [`response`] — Response payload assembly
//! - [`request`] — Query parameter validation
//! - [`source`] — Record sources and end-to-end computation
//! - [`error`] — Error types

pub mod error;
pub mod evaluator;
pub mod generator;
pub mod records;
pub mod request;
pub mod response;
pub mod source;
pub mod timerange;

pub use error::SlotError;
pub use evaluator::{evaluate, evaluate_records, CapacityRule, Containment, EvaluationOptions};
pub use generator::{day_bounds, generate_slots};
pub use records::{RecordDiagnostic, RecordSet};
pub use request::SlotRequest;
pub use response::{AvailabilityResponse, AvailableSlot};
pub use source::{find_availability, InMemorySource, RecordSource, Report};
pub use timerange::{format_timestamp, overlaps, parse_timestamp, TimeRange};
