//! Time and datetime normalization for list windows
//!
//! The backend stores list windows as local `YYYY-MM-DDTHH:MM:SS` strings
//! while operators type times as loose `H:MM` or `HH:MM`. Everything here
//! canonicalizes toward the seconds-precision wire form.

use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Wire format for datetime strings
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Normalize a clock time to canonical `HH:MM:SS`
///
/// Accepts `H:MM`, `HH:MM` and `HH:MM:SS` with optional surrounding
/// whitespace. Components are zero padded and range checked. Returns `None`
/// for anything malformed or out of range.
#[must_use]
pub fn normalize_time(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut parts = trimmed.split(':');
    let hour: u32 = parts.next()?.parse().ok()?;
    let minute: u32 = parts.next()?.parse().ok()?;
    let second: u32 = match parts.next() {
        Some(part) => part.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    Some(format!("{hour:02}:{minute:02}:{second:02}"))
}

/// Normalize a local datetime to canonical `YYYY-MM-DDTHH:MM:SS`
///
/// Guarantees a seconds component on datetimes coming from pickers that
/// emit minute precision. Returns `None` when the date or time part is
/// malformed.
#[must_use]
pub fn normalize_datetime(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (date_part, time_part) = trimmed.split_once('T')?;
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    let time = normalize_time(time_part)?;

    Some(format!("{}T{time}", date.format("%Y-%m-%d")))
}

/// Parse a list-window datetime string
///
/// # Errors
///
/// Returns [`Error::InvalidTime`] when the value cannot be normalized and
/// parsed as a local datetime.
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    let normalized = normalize_datetime(raw).ok_or_else(|| Error::invalid_time(raw))?;

    NaiveDateTime::parse_from_str(&normalized, DATETIME_FORMAT)
        .map_err(|_| Error::invalid_time(raw))
}

/// Validate that a window start strictly precedes its end
///
/// # Errors
///
/// Returns a field-level validation error when either bound is malformed or
/// when the end does not come after the start.
pub fn validate_window(start: &str, end: &str) -> Result<()> {
    let parsed_start =
        parse_datetime(start).map_err(|_| Error::validation("start_date", "must be a valid datetime"))?;
    let parsed_end =
        parse_datetime(end).map_err(|_| Error::validation("end_date", "must be a valid datetime"))?;

    if parsed_start >= parsed_end {
        return Err(Error::validation(
            "end_date",
            "must be after the start datetime",
        ));
    }

    Ok(())
}

/// Convert a list-window datetime to the ticketing service form
///
/// The ticketing API takes `YYYY-MM-DD HH:MM:SS` with a space separator.
#[must_use]
pub fn to_ticket_timestamp(datetime: &str) -> String {
    datetime.replacen('T', " ", 1)
}
