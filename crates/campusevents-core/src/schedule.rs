//! Day-by-day schedule of events.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::EventRecord;
use crate::time::EventDate;

/// Events on one calendar day, or sharing one unparseable display date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleDay {
    /// The display date of the first event in the group.
    pub date: String,
    /// The parsed date.
    pub day: EventDate,
    /// Whether this day is today.
    pub is_today: bool,
    /// Events on this day, in input order.
    pub events: Vec<EventRecord>,
}

/// Events grouped by day in chronological order.
///
/// Days whose date cannot be parsed come last, in the order they first
/// appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    pub days: Vec<ScheduleDay>,
}

/// Parsed dates group by day; unparseable ones by their display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey<'a> {
    Day(NaiveDate),
    Text(&'a str),
}

impl Schedule {
    /// Groups `events` by date, flagging the group on `today`.
    pub fn build(events: &[EventRecord], today: NaiveDate) -> Self {
        let mut days: Vec<ScheduleDay> = Vec::new();
        let mut index: HashMap<GroupKey<'_>, usize> = HashMap::new();

        for event in events {
            let text = event.date.trim();
            let day = EventDate::parse(text);
            let key = match day.as_date() {
                Some(date) => GroupKey::Day(date),
                None => GroupKey::Text(text),
            };
            match index.get(&key) {
                Some(&i) => days[i].events.push(event.clone()),
                None => {
                    index.insert(key, days.len());
                    days.push(ScheduleDay {
                        date: text.to_string(),
                        day,
                        is_today: day.is_on(today),
                        events: vec![event.clone()],
                    });
                }
            }
        }

        days.sort_by_key(|d| d.day);
        Self { days }
    }

    /// Returns true if there are no events.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total number of events across all days.
    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }

    /// Returns today's group, if any.
    pub fn today(&self) -> Option<&ScheduleDay> {
        self.days.iter().find(|d| d.is_today)
    }
}
