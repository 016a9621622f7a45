//! Resolves a calendar month of the report year into a half-open UTC interval.

use time::{Date, Month, OffsetDateTime};

use crate::Error;

/// The half-open interval `[start, end)` covering one calendar month.
///
/// Both bounds are midnight UTC on the first day of a month, so `end` is
/// exactly one calendar month after `start` regardless of the month length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    /// Midnight on the first day of the month.
    pub start: OffsetDateTime,
    /// Midnight on the first day of the following month.
    pub end: OffsetDateTime,
}

impl MonthRange {
    /// Whether `timestamp` falls inside the range.
    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        self.start <= timestamp && timestamp < self.end
    }
}

/// Get the date range for `month` (1-12) of `year`.
///
/// December rolls over to January 1st of the following year.
///
/// # Errors
/// Returns an:
/// - [Error::InvalidMonth] if `month` is not in 1-12,
/// - [Error::InvalidYear] if the range cannot be represented for `year`.
pub fn resolve_month(month: u8, year: i32) -> Result<MonthRange, Error> {
    let month = Month::try_from(month).map_err(|_| Error::InvalidMonth(month))?;

    let (end_year, end_month) = match month {
        Month::December => (year.checked_add(1).ok_or(Error::InvalidYear(year))?, Month::January),
        month => (year, month.next()),
    };

    let start = first_of_month(year, month)?;
    let end = first_of_month(end_year, end_month)?;

    Ok(MonthRange { start, end })
}

fn first_of_month(year: i32, month: Month) -> Result<OffsetDateTime, Error> {
    Date::from_calendar_date(year, month, 1)
        .map(|date| date.midnight().assume_utc())
        .map_err(|_| Error::InvalidYear(year))
}
