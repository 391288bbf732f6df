pub mod inventory;
pub mod journal;
pub mod system;
pub mod transaction;

use chrono::NaiveDateTime;

use lotledger_domain::{parse_timestamp, EventId};

use crate::cli::error::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in transaction::definitions()
        .into_iter()
        .chain(inventory::definitions())
        .chain(journal::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

pub(crate) fn parse_number(input: &str, label: &str) -> Result<f64, CommandError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid {label} `{input}`")))
}

/// Accepts `7` or `#7`.
pub(crate) fn parse_event_id(input: &str) -> Result<EventId, CommandError> {
    input
        .trim()
        .trim_start_matches('#')
        .parse::<u64>()
        .map(EventId)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid transaction id `{input}`")))
}

/// Joins the trailing arguments so `2024-01-01 10:00:00` works with or without quotes.
pub(crate) fn parse_optional_timestamp(
    parts: &[&str],
) -> Result<Option<NaiveDateTime>, CommandError> {
    if parts.is_empty() {
        return Ok(None);
    }
    let raw = parts.join(" ");
    parse_timestamp(&raw)
        .map(Some)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

pub(crate) fn usage_error(usage: &str) -> CommandError {
    CommandError::InvalidArguments(format!("usage: {usage}"))
}
