//! Period expansion for bulk list generation
//!
//! A period selection (day, custom, week, month) anchored on a calendar
//! date expands into per-day windows. Each window later becomes one list
//! creation request, so ordering and bounds matter more than speed here.

use crate::{Error, Result, timefmt};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Start of a full-day window
pub const DAY_START: &str = "00:00:00";

/// End of a full-day window
pub const DAY_END: &str = "23:59:59";

/// Granularity of a list-generation period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    /// One full anchor day
    Day,
    /// One anchor day with operator supplied times
    Custom,
    /// The Monday through Sunday week containing the anchor
    Week,
    /// Every day of the calendar month containing the anchor
    Month,
}

impl PeriodType {
    /// String form used on the wire
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Custom => "custom",
            Self::Week => "week",
            Self::Month => "month",
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One calendar day with an inclusive time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    /// Calendar day the window covers
    pub date: NaiveDate,
    /// Window start, canonical `HH:MM:SS`
    pub start_time: String,
    /// Window end, canonical `HH:MM:SS`
    pub end_time: String,
}

impl DayWindow {
    /// Window spanning the whole of `date`
    #[must_use]
    pub fn full_day(date: NaiveDate) -> Self {
        Self {
            date,
            start_time: DAY_START.to_string(),
            end_time: DAY_END.to_string(),
        }
    }

    /// Window start as a wire datetime
    #[must_use]
    pub fn start_datetime(&self) -> String {
        format!("{}T{}", self.date.format("%Y-%m-%d"), self.start_time)
    }

    /// Window end as a wire datetime
    #[must_use]
    pub fn end_datetime(&self) -> String {
        format!("{}T{}", self.date.format("%Y-%m-%d"), self.end_time)
    }
}

/// Expand a period selection into per-day windows
///
/// Day and custom periods produce a single window on the anchor. A week
/// produces the seven days Monday through Sunday of the week containing
/// the anchor. A month produces one window per calendar day of the
/// anchor's month. Windows come back in ascending date order.
///
/// Custom is the only shape that uses `start_time`/`end_time`; the other
/// shapes span full days and ignore them.
///
/// # Errors
///
/// Returns a field-level validation error when a custom period is missing
/// a time, carries a malformed time, or does not end after it starts.
pub fn expand_period(
    period: PeriodType,
    anchor: NaiveDate,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> Result<Vec<DayWindow>> {
    match period {
        PeriodType::Day => Ok(vec![DayWindow::full_day(anchor)]),
        PeriodType::Custom => {
            let start = normalize_custom_time("start_time", start_time)?;
            let end = normalize_custom_time("end_time", end_time)?;
            // Canonical HH:MM:SS strings order the same way the clock does.
            if start >= end {
                return Err(Error::validation("end_time", "must be after the start time"));
            }
            Ok(vec![DayWindow {
                date: anchor,
                start_time: start,
                end_time: end,
            }])
        }
        PeriodType::Week => {
            let back = u64::from(anchor.weekday().num_days_from_monday());
            let monday = anchor
                .checked_sub_days(Days::new(back))
                .ok_or_else(|| Error::validation("date", "anchor date out of range"))?;

            let mut windows = Vec::with_capacity(7);
            let mut day = monday;
            for _ in 0..7 {
                windows.push(DayWindow::full_day(day));
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            Ok(windows)
        }
        PeriodType::Month => {
            let first = anchor
                .with_day(1)
                .ok_or_else(|| Error::validation("date", "anchor date out of range"))?;

            let mut windows = Vec::new();
            let mut day = first;
            while day.month() == anchor.month() {
                windows.push(DayWindow::full_day(day));
                match day.succ_opt() {
                    Some(next) => day = next,
                    None => break,
                }
            }
            Ok(windows)
        }
    }
}

fn normalize_custom_time(field: &str, raw: Option<&str>) -> Result<String> {
    let value = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(field, "required for a custom period"))?;

    timefmt::normalize_time(value)
        .ok_or_else(|| Error::validation(field, "must be a valid HH:MM time"))
}
