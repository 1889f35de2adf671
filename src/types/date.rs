//! Date construction and validation for Mesonet retrievals.
//!
//! The Mesonet publishes data from 1994 onwards and nothing after the current time, so every
//! retrieval validates its date against those bounds before any request is made.

use crate::error::MesonetError;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime};

/// First year with Mesonet observations.
pub const FIRST_NETWORK_YEAR: i32 = 1994;

/// Builds the date-time used by the retrieval functions.
///
/// `day` defaults to the first of the month, `hour` and `minute` default to zero.
///
/// # Errors
///
/// Returns [`MesonetError::InvalidDateComponents`] if the components do not form a calendar
/// date-time (e.g. February 30th or hour 25).
///
/// # Examples
///
/// ```
/// use mesonet_soil::generate_date;
///
/// let date = generate_date(2024, 3, Some(15), None, None).unwrap();
/// assert_eq!(date.to_string(), "2024-03-15 00:00:00");
/// assert!(generate_date(2024, 2, Some(30), None, None).is_err());
/// ```
pub fn generate_date(
    year: i32,
    month: u32,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
) -> Result<NaiveDateTime, MesonetError> {
    let day = day.unwrap_or(1);
    let hour = hour.unwrap_or(0);
    let minute = minute.unwrap_or(0);

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or(MesonetError::InvalidDateComponents {
            year,
            month,
            day,
            hour,
            minute,
        })
}

/// Checks that `date` is neither in the future nor earlier than 1994.
pub fn validate_date(date: NaiveDateTime) -> Result<(), MesonetError> {
    validate_date_at(date, Local::now().naive_local())
}

/// Same as [`validate_date`] with an explicit clock.
pub fn validate_date_at(date: NaiveDateTime, now: NaiveDateTime) -> Result<(), MesonetError> {
    if date > now {
        return Err(MesonetError::FutureDate(date));
    }
    if date.year() < FIRST_NETWORK_YEAR {
        return Err(MesonetError::DateBeforeNetwork(date));
    }
    Ok(())
}

/// The default retrieval date: exactly one day before now.
pub fn yesterday() -> NaiveDateTime {
    Local::now().naive_local() - Duration::days(1)
}

/// Applies the default date when none is given, then validates it.
pub fn resolve_date(date: Option<NaiveDateTime>) -> Result<NaiveDateTime, MesonetError> {
    let date = date.unwrap_or_else(yesterday);
    validate_date(date)?;
    Ok(date)
}

/// Values that can be turned into a retrieval date-time.
pub trait AnyDateTime {
    fn to_naive_datetime(self) -> Option<NaiveDateTime>;
}

impl AnyDateTime for NaiveDateTime {
    fn to_naive_datetime(self) -> Option<NaiveDateTime> {
        Some(self)
    }
}

impl AnyDateTime for NaiveDate {
    fn to_naive_datetime(self) -> Option<NaiveDateTime> {
        self.and_hms_opt(0, 0, 0)
    }
}

impl AnyDateTime for DateTime<Local> {
    fn to_naive_datetime(self) -> Option<NaiveDateTime> {
        Some(self.naive_local())
    }
}

impl AnyDateTime for &str {
    fn to_naive_datetime(self) -> Option<NaiveDateTime> {
        let trimmed = self.trim();
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.to_naive_datetime())
            })
    }
}

impl AnyDateTime for String {
    fn to_naive_datetime(self) -> Option<NaiveDateTime> {
        self.as_str().to_naive_datetime()
    }
}

/// Parses a date given as text, a `NaiveDate` or any other [`AnyDateTime`].
///
/// # Errors
///
/// Returns [`MesonetError::UnparseableDate`] if the value is not a well-formed date.
pub fn parse_date<T: AnyDateTime + ToString + Clone>(value: T) -> Result<NaiveDateTime, MesonetError> {
    value
        .clone()
        .to_naive_datetime()
        .ok_or_else(|| MesonetError::UnparseableDate(value.to_string()))
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_month_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_day_of_next_month = NaiveDate::from_ymd_opt(next_month_year, next_month, 1)?;
    let last_day_of_current_month = first_day_of_next_month - Duration::days(1);
    Some(last_day_of_current_month.day())
}

/// Midnight of every day of `year`-`month` that is not later than `limit`.
pub(crate) fn month_dates(
    year: i32,
    month: u32,
    limit: NaiveDateTime,
) -> Result<Vec<NaiveDateTime>, MesonetError> {
    let days = days_in_month(year, month).ok_or(MesonetError::InvalidMonth { year, month })?;
    Ok((1..=days)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0))
        .filter(|date| *date <= limit)
        .collect())
}
