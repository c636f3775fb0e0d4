/// Calendar dates at day granularity.
///
/// A `Date` built through `Date::new` is always a real calendar day between
/// 1/1/1900 and 12/31/9999. `Date::parse` only splits the `M/D/YYYY` token
/// into numbers; the result must be checked with `is_valid` before use.

use chrono::{Datelike, Local, NaiveDate, Weekday};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{ClinicError, Result};

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 9999;
const FEBRUARY: i32 = 2;
const DAYS_IN_MONTH: [i32; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date {
    year: i32,
    month: i32,
    day: i32,
}

impl Date {
    /// Create a date, rejecting anything that is not a real calendar day.
    pub fn new(year: i32, month: i32, day: i32) -> Result<Self> {
        let date = Date { year, month, day };
        if !date.is_valid() {
            return Err(ClinicError::InvalidDate(date.to_string()));
        }
        Ok(date)
    }

    /// Split an `M/D/YYYY` token without checking the calendar.
    ///
    /// Returns `None` only when the token is not three numeric parts.
    pub fn parse(token: &str) -> Option<Self> {
        let mut parts = token.trim().split('/');
        let month = parts.next()?.trim().parse().ok()?;
        let day = parts.next()?.trim().parse().ok()?;
        let year = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Date { year, month, day })
    }

    /// The current local calendar day.
    pub fn today() -> Self {
        let now = Local::now().date_naive();
        Date {
            year: now.year(),
            month: now.month() as i32,
            day: now.day() as i32,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    pub fn day(&self) -> i32 {
        self.day
    }

    /// Whether the date is a real calendar day in the supported year range.
    pub fn is_valid(&self) -> bool {
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return false;
        }
        if !(1..=12).contains(&self.month) || self.day < 1 {
            return false;
        }
        self.day <= days_in_month(self.month, self.year)
    }

    /// Move forward by whole months, clamping the day to the target month.
    ///
    /// The result saturates at 12/31/9999, and at 1/1/1900 for an unchecked
    /// date from `parse` whose year is already out of range.
    pub fn add_months(&self, months: u32) -> Self {
        let total = i64::from(self.month) - 1 + i64::from(months);
        let year = i64::from(self.year) + total.div_euclid(12);
        if year > i64::from(MAX_YEAR) {
            return Date { year: MAX_YEAR, month: 12, day: 31 };
        }
        if year < i64::from(MIN_YEAR) {
            return Date { year: MIN_YEAR, month: 1, day: 1 };
        }
        let year = year as i32;
        let month = total.rem_euclid(12) as i32 + 1;
        let day = self.day.min(days_in_month(month, year));
        Date { year, month, day }
    }

    /// Whether the date falls on a Saturday or Sunday.
    pub fn is_weekend(&self) -> bool {
        match self.to_naive() {
            Some(date) => matches!(date.weekday(), Weekday::Sat | Weekday::Sun),
            None => false,
        }
    }

    fn to_naive(self) -> Option<NaiveDate> {
        if self.month < 1 || self.day < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month as u32, self.day as u32)
    }
}

/// Gregorian leap year rule.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

fn days_in_month(month: i32, year: i32) -> i32 {
    if month == FEBRUARY && is_leap_year(year) {
        return 29;
    }
    DAYS_IN_MONTH[month as usize]
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}

impl FromStr for Date {
    type Err = ClinicError;

    /// Parse and validate in one step.
    fn from_str(s: &str) -> Result<Self> {
        let date = Date::parse(s).ok_or_else(|| ClinicError::InvalidDate(s.to_string()))?;
        if !date.is_valid() {
            return Err(ClinicError::InvalidDate(s.to_string()));
        }
        Ok(date)
    }
}
