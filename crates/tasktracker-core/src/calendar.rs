use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, FixedOffset, Local, Months, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

/// Inclusive range of dates covering one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl MonthRange {
    pub fn containing(date: NaiveDate) -> Self {
        let first = date - chrono::Duration::days(i64::from(date.day0()));
        Self {
            first,
            last: last_day_of_month(first),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// e.g. "February 2024".
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }
}

/// Last day of the month `date` falls in; 28 to 31 days, leap years included.
pub fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let first = date - chrono::Duration::days(i64::from(date.day0()));
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Error)]
#[error("invalid time zone {0:?}: expected \"local\", \"UTC\" or an offset like +05:30")]
pub struct ParseTimeZoneError(String);

/// Zone in which "today" is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeZoneSetting {
    /// The host's zone, DST rules included.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl TimeZoneSetting {
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            TimeZoneSetting::Local => now.with_timezone(&Local).date_naive(),
            TimeZoneSetting::Fixed(offset) => now.with_timezone(offset).date_naive(),
        }
    }
}

impl FromStr for TimeZoneSetting {
    type Err = ParseTimeZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(TimeZoneSetting::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return FixedOffset::east_opt(0)
                .map(TimeZoneSetting::Fixed)
                .ok_or_else(|| ParseTimeZoneError(s.to_string()));
        }
        trimmed
            .parse::<FixedOffset>()
            .map(TimeZoneSetting::Fixed)
            .map_err(|_| ParseTimeZoneError(s.to_string()))
    }
}

impl fmt::Display for TimeZoneSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeZoneSetting::Local => f.write_str("local"),
            TimeZoneSetting::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}
