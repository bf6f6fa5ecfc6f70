//! Output formatting for events, schedules and communities.
//!
//! Two output formats are supported:
//! - **TTY**: one card per event for terminal display
//! - **JSON**: the records themselves, for scripting
//!
//! # Example
//!
//! ```rust
//! use campusevents_core::event::EventRecord;
//! use campusevents_core::format::{FormatOptions, OutputFormatter};
//!
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let events = vec![EventRecord::new("event-1", "AI Workshop Series")];
//! let text = formatter.format_events(&events);
//! assert!(text.starts_with("AI Workshop Series"));
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::community::{Community, CommunityDirectory};
use crate::event::EventRecord;
use crate::schedule::Schedule;

/// Shown instead of an empty event list.
pub const NO_EVENTS_HINT: &str = "No events found. Try adjusting your search or filters.";

/// Shown instead of an empty schedule.
pub const NO_SCHEDULE_HINT: &str = "No upcoming events.";

/// Shown instead of an empty community list.
pub const NO_COMMUNITIES_HINT: &str = "No communities found.";

const SEPARATOR: &str = " · ";

/// The output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal output.
    #[default]
    Tty,
    /// Machine-readable JSON output.
    Json,
}

/// Options for TTY output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Maximum length for event titles (truncated with ellipsis).
    pub max_title_length: Option<usize>,
    /// Whether event cards include the description.
    pub show_description: bool,
}

/// JSON output for an event list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    pub events: Vec<EventRecord>,
    /// Number of events returned.
    pub count: usize,
}

impl JsonOutput {
    pub fn new(events: Vec<EventRecord>) -> Self {
        let count = events.len();
        Self { events, count }
    }
}

/// Renders events, schedules and communities as text.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    fn title<'a>(&self, title: &'a str) -> Cow<'a, str> {
        match self.options.max_title_length {
            Some(max) => ellipsis(title, max),
            None => Cow::Borrowed(title),
        }
    }

    /// Formats one event as a card.
    ///
    /// ```text
    /// AI Workshop Series [Workshop]
    ///   April 22, 2025 · 2:00 PM - 5:00 PM · Engineering Block, Room 302
    ///   by AI Club · 54 attending
    /// ```
    pub fn format_event(&self, event: &EventRecord) -> String {
        let mut lines = Vec::with_capacity(4);

        let marker = if event.spotlight { "★ " } else { "" };
        let mut heading = format!("{}{}", marker, self.title(&event.title));
        if !event.category.is_empty() {
            heading.push_str(&format!(" [{}]", event.category));
        }
        lines.push(heading);

        let when_where = join_present(&[
            event.date.as_str(),
            event.time.as_str(),
            event.location.as_str(),
        ]);
        if !when_where.is_empty() {
            lines.push(format!("  {}", when_where));
        }

        let attending = format!("{} attending", event.attendees);
        let who = if event.organizer.is_empty() {
            attending
        } else {
            format!("by {}{}{}", event.organizer, SEPARATOR, attending)
        };
        lines.push(format!("  {}", who));

        if self.options.show_description && !event.description.is_empty() {
            lines.push(format!("  {}", event.description));
        }

        lines.join("\n")
    }

    /// Formats an event list, one card per event separated by blank lines.
    pub fn format_events(&self, events: &[EventRecord]) -> String {
        if events.is_empty() {
            return NO_EVENTS_HINT.to_string();
        }
        events
            .iter()
            .map(|e| self.format_event(e))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Formats a single event with every field.
    pub fn format_event_detail(&self, event: &EventRecord) -> String {
        let mut out = self.format_event(event);
        if !self.options.show_description && !event.description.is_empty() {
            out.push_str(&format!("\n\n{}", event.description));
        }
        out.push_str(&format!("\n\nid: {}", event.id));
        if let Some(ref url) = event.image_url {
            out.push_str(&format!("\nimage: {}", url));
        }
        out
    }

    /// Formats a schedule, one heading per day.
    pub fn format_schedule(&self, schedule: &Schedule) -> String {
        if schedule.is_empty() {
            return NO_SCHEDULE_HINT.to_string();
        }

        let mut blocks = Vec::with_capacity(schedule.days.len());
        for day in &schedule.days {
            let mut lines = Vec::with_capacity(day.events.len() + 1);
            if day.is_today {
                lines.push(format!("{} (today)", day.date));
            } else {
                lines.push(day.date.clone());
            }
            for event in &day.events {
                let title = self.title(&event.title);
                let details = join_present(&[title.as_ref(), event.location.as_str()]);
                if event.time.is_empty() {
                    lines.push(format!("  {}", details));
                } else {
                    lines.push(format!("  {}  {}", event.time, details));
                }
            }
            blocks.push(lines.join("\n"));
        }
        blocks.join("\n\n")
    }

    /// Formats communities, marking the ones the user joined.
    pub fn format_communities(
        &self,
        communities: &[&Community],
        directory: &CommunityDirectory,
    ) -> String {
        if communities.is_empty() {
            return NO_COMMUNITIES_HINT.to_string();
        }
        communities
            .iter()
            .map(|c| {
                let joined = if directory.is_joined(&c.id) { " [joined]" } else { "" };
                format!(
                    "{}{}\n  {}\n  {} members{}{} events",
                    c.name, joined, c.description, c.members, SEPARATOR, c.events
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Builds the JSON output for an event list.
    pub fn format_json(&self, events: &[EventRecord]) -> JsonOutput {
        JsonOutput::new(events.to_vec())
    }
}

/// Joins the non-empty parts with a middle dot.
fn join_present(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

/// Truncates a string with "..." if it is longer than `max_len` characters.
pub fn ellipsis(s: &str, max_len: usize) -> Cow<'_, str> {
    if max_len == 0 {
        return Cow::Borrowed("");
    }
    if s.chars().count() <= max_len {
        return Cow::Borrowed(s);
    }
    let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
    Cow::Owned(format!("{}...", truncated))
}
