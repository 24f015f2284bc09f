//! Resolving the cutoff instant for log pruning.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};

use crate::error::LogCleanerError;
use crate::Result;

/// Age used when no cutoff is given.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// How the cutoff was specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cutoff {
    /// Drop entries before local midnight of this date
    Before(NaiveDate),
    /// Drop entries older than this, measured from now
    OlderThan(Duration),
}

impl Default for Cutoff {
    fn default() -> Self {
        Self::OlderThan(Duration::days(DEFAULT_MAX_AGE_DAYS))
    }
}

impl Cutoff {
    /// Build a cutoff from the `--before` / `--older-than` arguments.
    ///
    /// `before` wins when both are given; neither means the default age.
    pub fn from_args(before: Option<&str>, older_than: Option<&str>) -> Result<Self> {
        match (before, older_than) {
            (Some(date), _) => Ok(Self::Before(parse_date(date)?)),
            (None, Some(age)) => Ok(Self::OlderThan(parse_duration(age)?)),
            (None, None) => Ok(Self::default()),
        }
    }

    /// The cutoff instant relative to `now`.
    pub fn resolve_at(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            Self::Before(date) => date.and_time(chrono::NaiveTime::MIN),
            Self::OlderThan(age) => now
                .checked_sub_signed(*age)
                .unwrap_or(NaiveDateTime::MIN),
        }
    }

    /// The cutoff instant relative to the current local time.
    pub fn resolve(&self) -> NaiveDateTime {
        self.resolve_at(Local::now().naive_local())
    }
}

/// Parse a `YYYY-MM-DD` date with a year in 1970..=2100.
pub fn parse_date(date_str: &str) -> Result<NaiveDate> {
    let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        LogCleanerError::InvalidDate(format!("expected YYYY-MM-DD, got: {date_str}"))
    })?;

    let year = date.year();
    if !(1970..=2100).contains(&year) {
        return Err(LogCleanerError::InvalidDate(format!(
            "year must be between 1970 and 2100, got: {year}"
        )));
    }

    Ok(date)
}

/// Parse an age with an optional unit suffix.
///
/// Supports h (hours), d (days), w (weeks) and m (months of 30 days).
/// A plain number is a number of days: `"15"`, `"15d"`, `"2w"`, `"3m"`, `"48h"`.
pub fn parse_duration(duration_str: &str) -> Result<Duration> {
    let trimmed = duration_str.trim();

    let (num_str, unit) = match trimmed.find(|c: char| c.is_alphabetic()) {
        Some(pos) => {
            let (num, unit) = trimmed.split_at(pos);
            (num, Some(unit))
        }
        None => (trimmed, None),
    };

    let value: i64 = num_str.trim().parse().map_err(|_| {
        LogCleanerError::InvalidDuration(format!("expected a number, got: {num_str}"))
    })?;
    if value < 0 {
        return Err(LogCleanerError::InvalidDuration(format!(
            "age cannot be negative: {duration_str}"
        )));
    }

    let hours = match unit {
        None | Some("d") | Some("D") => value.checked_mul(24),
        Some("h") | Some("H") => Some(value),
        Some("w") | Some("W") => value.checked_mul(7 * 24),
        Some("m") | Some("M") => value.checked_mul(30 * 24),
        Some(other) => {
            return Err(LogCleanerError::InvalidDuration(format!(
                "unknown unit '{other}', expected h, d, w or m"
            )))
        }
    };

    hours
        .and_then(Duration::try_hours)
        .ok_or_else(|| LogCleanerError::InvalidDuration(format!("age too large: {duration_str}")))
}
