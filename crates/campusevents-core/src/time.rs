//! Date types for campus events.
//!
//! This module provides [`EventDate`], the parsed form of an event's display
//! date (`"April 22, 2025"`), and [`DayWindow`], an inclusive range of
//! calendar days used by the time-window tabs.

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Display format of event dates, e.g. `"April 22, 2025"`.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// The parsed date of an event.
///
/// Display dates that cannot be parsed (ranges such as `"May 5-6, 2025"`,
/// free text) become [`EventDate::Invalid`].
///
/// The ordering is total: valid dates compare chronologically and every
/// valid date is less than `Invalid`. Two invalid dates are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum EventDate {
    /// A calendar day.
    Day(NaiveDate),
    /// The display date could not be parsed.
    Invalid,
}

impl EventDate {
    /// Parses a display date such as `"April 22, 2025"`.
    pub fn parse(s: &str) -> Self {
        match NaiveDate::parse_from_str(s.trim(), DISPLAY_DATE_FORMAT) {
            Ok(date) => Self::Day(date),
            Err(e) => {
                trace!(input = s, error = %e, "unparseable event date");
                Self::Invalid
            }
        }
    }

    /// Returns `true` if the date was parsed.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Day(_))
    }

    /// Returns the calendar day if valid.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Day(d) => Some(*d),
            Self::Invalid => None,
        }
    }

    /// Checks if this date is exactly the given calendar day.
    ///
    /// Always `false` for invalid dates.
    pub fn is_on(&self, day: NaiveDate) -> bool {
        self.as_date() == Some(day)
    }
}

impl From<NaiveDate> for EventDate {
    fn from(date: NaiveDate) -> Self {
        Self::Day(date)
    }
}

/// An inclusive range of calendar days `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Last day of the window (inclusive).
    pub end: NaiveDate,
}

impl DayWindow {
    /// Creates a new day window.
    ///
    /// # Panics
    ///
    /// Panics if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        assert!(start <= end, "DayWindow start must be <= end");
        Self { start, end }
    }

    /// A window covering only `day`.
    pub fn single(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    /// `[today, today + 7 days]`.
    pub fn week_from(today: NaiveDate) -> Self {
        let end = today.checked_add_days(Days::new(7)).unwrap_or(NaiveDate::MAX);
        Self::new(today, end)
    }

    /// `[today, today + 1 month]`.
    ///
    /// When the next month is shorter than `today`'s day of month, the end
    /// clamps to the last day of that month (January 31 → February 28).
    pub fn month_from(today: NaiveDate) -> Self {
        let end = today
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self::new(today, end)
    }

    /// Number of days covered, counting both ends.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Checks if a day falls within this window (both ends inclusive).
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Checks if an event date falls within this window.
    ///
    /// Invalid dates are never contained.
    pub fn contains_event_date(&self, date: &EventDate) -> bool {
        date.as_date().is_some_and(|d| self.contains(d))
    }
}
