//! Filtering and sorting of event lists.
//!
//! [`EventFilter`] narrows a snapshot of [`EventRecord`]s by free-text query,
//! time-window [`Tab`] and category, then sorts the survivors by a
//! [`SortKey`]. Filtering is pure: the input slice is never modified and the
//! same criteria always produce the same output.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use campusevents_core::event::EventRecord;
//! use campusevents_core::filter::{EventFilter, FilterCriteria, SortKey};
//!
//! let events = vec![
//!     EventRecord::new("a", "AI Workshop Series").with_attendees(54),
//!     EventRecord::new("b", "Career Fair").with_attendees(198),
//! ];
//! let criteria = FilterCriteria::default().with_sort(SortKey::Popular);
//! let today = NaiveDate::from_ymd_opt(2025, 4, 20).unwrap();
//!
//! let result = EventFilter::new(criteria).apply(&events, today);
//! assert_eq!(result[0].id, "b");
//! ```

use std::cmp::Reverse;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::event::EventRecord;
use crate::time::DayWindow;

/// Category value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// A coarse time-window filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// No time filtering.
    #[default]
    All,
    /// Events happening today.
    Today,
    /// Events from today through seven days ahead.
    Week,
    /// Events from today through one calendar month ahead.
    Month,
}

impl Tab {
    /// Parses a tab name, falling back to [`Tab::All`] for unknown values.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Self::All,
            "today" => Self::Today,
            "week" => Self::Week,
            "month" => Self::Month,
            other => {
                warn!(tab = other, "unknown tab, showing all events");
                Self::All
            }
        }
    }

    /// Returns the tab name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Returns the day window this tab selects, or `None` for [`Tab::All`].
    pub fn window(&self, today: NaiveDate) -> Option<DayWindow> {
        match self {
            Self::All => None,
            Self::Today => Some(DayWindow::single(today)),
            Self::Week => Some(DayWindow::week_from(today)),
            Self::Month => Some(DayWindow::month_from(today)),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort order for filtered events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Latest date first.
    #[default]
    Newest,
    /// Earliest date first.
    Oldest,
    /// Most attendees first.
    Popular,
}

impl SortKey {
    /// Parses a sort key.
    ///
    /// Unknown values yield `None`, which keeps the input order.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "popular" => Some(Self::Popular),
            other => {
                warn!(sort = other, "unknown sort key, keeping fetched order");
                None
            }
        }
    }

    /// Returns the sort key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popular => "popular",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The criteria an event list is filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Free-text query; blank disables text search. Surrounding whitespace
    /// is trimmed before matching, so `" ai "` matches like `"ai"`.
    pub search_query: String,
    /// Time-window tab.
    pub tab: Tab,
    /// Category to keep (case-insensitive), or `"all"`.
    pub category: String,
    /// Sort order; `None` keeps the input order.
    pub sort_by: Option<SortKey>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            tab: Tab::All,
            category: ALL_CATEGORIES.to_string(),
            sort_by: Some(SortKey::Newest),
        }
    }
}

impl FilterCriteria {
    /// Builds criteria from raw user input.
    ///
    /// Unknown tab and sort values are treated as no-ops rather than errors.
    pub fn from_raw(search_query: &str, tab: &str, category: &str, sort_by: &str) -> Self {
        Self {
            search_query: search_query.to_string(),
            tab: Tab::parse_lenient(tab),
            category: category.to_string(),
            sort_by: SortKey::parse_lenient(sort_by),
        }
    }

    /// Builder method to set the search query.
    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = query.into();
        self
    }

    /// Builder method to set the tab.
    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.tab = tab;
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder method to set the sort key.
    pub fn with_sort(mut self, sort_by: SortKey) -> Self {
        self.sort_by = Some(sort_by);
        self
    }

    /// Builder method to keep the input order.
    pub fn unsorted(mut self) -> Self {
        self.sort_by = None;
        self
    }

    /// Returns true if the category criterion selects every category.
    pub fn is_all_categories(&self) -> bool {
        let category = self.category.trim();
        category.is_empty() || category.eq_ignore_ascii_case(ALL_CATEGORIES)
    }
}

/// Applies [`FilterCriteria`] to event snapshots.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    criteria: FilterCriteria,
}

impl EventFilter {
    /// Creates a filter for the given criteria.
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    /// Returns the criteria.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Filters and sorts `events` with `today` as the reference day.
    ///
    /// Stages run in order: text search, tab, category, sort.
    pub fn apply(&self, events: &[EventRecord], today: NaiveDate) -> Vec<EventRecord> {
        let criteria = &self.criteria;
        let mut result: Vec<EventRecord> = events.to_vec();

        let query = criteria.search_query.trim();
        if !query.is_empty() {
            let needle = query.to_lowercase();
            result.retain(|e| e.matches_text(&needle));
            debug!(query, remaining = result.len(), "applied text search");
        }

        if let Some(window) = criteria.tab.window(today) {
            result.retain(|e| window.contains_event_date(&e.event_date()));
            debug!(tab = %criteria.tab, remaining = result.len(), "applied tab filter");
        }

        if !criteria.is_all_categories() {
            let category = criteria.category.trim().to_lowercase();
            result.retain(|e| e.category.to_lowercase() == category);
            debug!(category = %category, remaining = result.len(), "applied category filter");
        }

        // All sorts below are stable.
        match criteria.sort_by {
            Some(SortKey::Newest) => result.sort_by_cached_key(|e| Reverse(e.event_date())),
            Some(SortKey::Oldest) => result.sort_by_cached_key(|e| e.event_date()),
            Some(SortKey::Popular) => result.sort_by_key(|e| Reverse(e.attendees)),
            None => {}
        }

        result
    }
}

/// Convenience function to filter events.
///
/// See [`EventFilter::apply`] for details.
pub fn filter_events(
    events: &[EventRecord],
    criteria: &FilterCriteria,
    today: NaiveDate,
) -> Vec<EventRecord> {
    EventFilter::new(criteria.clone()).apply(events, today)
}
