//! Shared identifiers, traits, and timestamp utilities for ledger primitives.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Quantities whose magnitude falls at or below this threshold are treated as zero.
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Canonical textual form of a ledger timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ALTERNATE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Journal-wide event identifier. Assigned monotonically and never reused.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl EventId {
    pub fn value(self) -> u64 {
        self.0
    }

    /// The following id, or `None` once the id space is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Exposes the journal identifier of an entity.
pub trait Identifiable {
    fn id(&self) -> EventId;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returns `true` when `value` is within [`QUANTITY_EPSILON`] of zero.
pub fn is_negligible(value: f64) -> bool {
    value.abs() <= QUANTITY_EPSILON
}

/// Drops any sub-second component so timestamps compare at second resolution.
pub fn truncate_to_second(timestamp: NaiveDateTime) -> NaiveDateTime {
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}

/// Formats a timestamp using [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, or a bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Empty);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT) {
        return Ok(truncate_to_second(parsed));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, ALTERNATE_TIMESTAMP_FORMAT) {
        return Ok(truncate_to_second(parsed));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError::Malformed(trimmed.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Errors raised while parsing ledger timestamps.
pub enum TimestampError {
    Empty,
    Malformed(String),
}

impl fmt::Display for TimestampError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampError::Empty => f.write_str("timestamp is empty"),
            TimestampError::Malformed(raw) => write!(
                f,
                "timestamp `{}` is not in YYYY-MM-DD HH:MM:SS format",
                raw
            ),
        }
    }
}

impl std::error::Error for TimestampError {}
