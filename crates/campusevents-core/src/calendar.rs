//! Calendar deep links for events.
//!
//! [`CalendarLinkBuilder`] turns an event's display date (`"April 22, 2025"`)
//! and time range (`"2:00 PM - 5:00 PM"`) into an "add to calendar" URL for
//! an external calendar service.
//!
//! Parsing is strict. Date ranges (`"May 5-6, 2025"`), abbreviated months
//! (`"Sept"`) and free-form times (`"Starts at 9:00 AM"`) are rejected with a
//! [`CalendarLinkError`] for which [`CalendarLinkError::is_date_parse`] holds.
//!
//! # Example
//!
//! ```
//! use campusevents_core::calendar::{CalendarEventInput, CalendarLinkBuilder};
//!
//! let input = CalendarEventInput {
//!     title: "AI Workshop Series",
//!     description: "Intro to machine learning",
//!     location: "Room 302",
//!     date: "April 22, 2025",
//!     time: "2:00 PM - 5:00 PM",
//! };
//! let link = CalendarLinkBuilder::new().build(&input).unwrap();
//! assert_eq!(link.dates(), "20250422T140000/20250422T170000");
//! ```

use std::sync::LazyLock;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::event::EventRecord;

/// Default calendar service endpoint.
pub const DEFAULT_CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// Compact timestamp layout used in the `dates` parameter.
pub const CALENDAR_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M00";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Regex for a 12-hour clock time such as `9:00 AM`.
static CLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}) (AM|PM)$").expect("Invalid clock regex")
});

/// Errors produced while building a calendar link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarLinkError {
    /// The month name is not a full English month name.
    #[error("unknown month name: {0:?}")]
    UnknownMonth(String),

    /// The date is not of the form `<Month> <Day>, <Year>`.
    #[error("malformed date: {0:?}")]
    MalformedDate(String),

    /// The time is not of the form `H:MM AM|PM[ - H:MM AM|PM]`.
    #[error("malformed time: {0:?}")]
    MalformedTime(String),

    /// The assembled URL did not parse.
    #[error("invalid calendar URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CalendarLinkError {
    /// Returns true if the event's date or time string was rejected.
    pub fn is_date_parse(&self) -> bool {
        matches!(
            self,
            Self::UnknownMonth(_) | Self::MalformedDate(_) | Self::MalformedTime(_)
        )
    }
}

/// The fields of an event a calendar link is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarEventInput<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub date: &'a str,
    pub time: &'a str,
}

impl<'a> From<&'a EventRecord> for CalendarEventInput<'a> {
    fn from(event: &'a EventRecord) -> Self {
        Self {
            title: &event.title,
            description: &event.description,
            location: &event.location,
            date: &event.date,
            time: &event.time,
        }
    }
}

/// A built calendar link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarLink {
    /// Start of the event, local wall-clock time.
    pub start: NaiveDateTime,
    /// End of the event, local wall-clock time.
    pub end: NaiveDateTime,
    /// The deep link.
    pub url: Url,
}

impl CalendarLink {
    /// Returns the `dates` parameter value, `<start>/<end>`.
    pub fn dates(&self) -> String {
        format!(
            "{}/{}",
            self.start.format(CALENDAR_TIMESTAMP_FORMAT),
            self.end.format(CALENDAR_TIMESTAMP_FORMAT)
        )
    }
}

/// Builds calendar deep links.
#[derive(Debug, Clone)]
pub struct CalendarLinkBuilder {
    base_url: String,
}

impl Default for CalendarLinkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarLinkBuilder {
    /// Creates a builder targeting the default calendar service.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_CALENDAR_BASE_URL.to_string(),
        }
    }

    /// Builder method to set the calendar service endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Returns the calendar service endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds a calendar link for `event`.
    pub fn build(&self, event: &CalendarEventInput<'_>) -> Result<CalendarLink, CalendarLinkError> {
        let (start, end) = match event_span(event.date, event.time) {
            Ok(span) => span,
            Err(e) => {
                warn!(date = event.date, time = event.time, error = %e, "cannot build calendar link");
                return Err(e);
            }
        };

        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        let raw = format!(
            "{}{}action=TEMPLATE&text={}&dates={}/{}&details={}&location={}",
            self.base_url,
            separator,
            urlencoding::encode(event.title),
            start.format(CALENDAR_TIMESTAMP_FORMAT),
            end.format(CALENDAR_TIMESTAMP_FORMAT),
            urlencoding::encode(event.description),
            urlencoding::encode(event.location),
        );
        let url = Url::parse(&raw)?;

        debug!(title = event.title, url = %url, "built calendar link");
        Ok(CalendarLink { start, end, url })
    }

    /// Builds a calendar link for an event record.
    pub fn build_for(&self, event: &EventRecord) -> Result<CalendarLink, CalendarLinkError> {
        self.build(&CalendarEventInput::from(event))
    }
}

/// Parses a display date and time range into start and end date-times.
fn event_span(
    date: &str,
    time: &str,
) -> Result<(NaiveDateTime, NaiveDateTime), CalendarLinkError> {
    let day = parse_display_date(date)?;
    let (start_time, end_time) = parse_time_range(time)?;

    // Spans that would end past the last representable date are rejected.
    let past_range = || CalendarLinkError::MalformedDate(date.to_string());

    let start = day.and_time(start_time);
    let end = match end_time {
        None => start
            .checked_add_signed(TimeDelta::hours(1))
            .ok_or_else(past_range)?,
        Some(t) => {
            let end = day.and_time(t);
            if end < start {
                end.checked_add_days(Days::new(1)).ok_or_else(past_range)?
            } else {
                end
            }
        }
    };
    Ok((start, end))
}

/// Parses `"<Month> <Day>, <Year>"`.
fn parse_display_date(s: &str) -> Result<NaiveDate, CalendarLinkError> {
    let malformed = || CalendarLinkError::MalformedDate(s.to_string());

    let [month_day, year] = split_exact::<2>(s, ", ").ok_or_else(malformed)?;
    let [month_name, day] = split_exact::<2>(month_day, " ").ok_or_else(malformed)?;

    let month = MONTHS
        .iter()
        .position(|m| *m == month_name)
        .ok_or_else(|| CalendarLinkError::UnknownMonth(month_name.to_string()))?;
    let day: u32 = day.parse().map_err(|_| malformed())?;
    let year: i32 = year.parse().map_err(|_| malformed())?;

    NaiveDate::from_ymd_opt(year, month as u32 + 1, day).ok_or_else(malformed)
}

/// Parses `"H:MM AM|PM"` or `"H:MM AM|PM - H:MM AM|PM"`.
fn parse_time_range(s: &str) -> Result<(NaiveTime, Option<NaiveTime>), CalendarLinkError> {
    let mut parts = s.split(" - ");
    let start = parts.next().map(parse_clock).transpose()?;
    let end = parts.next().map(parse_clock).transpose()?;

    match (start, parts.next()) {
        (Some(start), None) => Ok((start, end)),
        _ => Err(CalendarLinkError::MalformedTime(s.to_string())),
    }
}

/// Converts a 12-hour clock string to a time of day.
fn parse_clock(s: &str) -> Result<NaiveTime, CalendarLinkError> {
    let malformed = || CalendarLinkError::MalformedTime(s.to_string());

    let caps = CLOCK_REGEX.captures(s.trim()).ok_or_else(malformed)?;
    let hour: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minute: u32 = caps[2].parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(malformed());
    }

    let hour = match (hour, &caps[3]) {
        (12, "AM") => 0,
        (12, _) => 12,
        (h, "PM") => h + 12,
        (h, _) => h,
    };
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(malformed)
}

/// Splits `s` on `sep` into exactly `N` parts.
fn split_exact<'a, const N: usize>(s: &'a str, sep: &str) -> Option<[&'a str; N]> {
    let parts: Vec<&str> = s.split(sep).collect();
    parts.try_into().ok()
}
