//! Core types: events, display dates, filters, calendar links, formatting

pub mod calendar;
pub mod community;
pub mod event;
pub mod filter;
pub mod format;
pub mod schedule;
pub mod time;
pub mod tracing;

pub use calendar::{CalendarEventInput, CalendarLink, CalendarLinkBuilder, CalendarLinkError};
pub use community::{Community, CommunityDirectory, CommunityTab, builtin_communities};
pub use event::{EventRecord, FieldIssue, NewEvent, ValidationError, featured_event};
pub use filter::{EventFilter, FilterCriteria, SortKey, Tab, filter_events};
pub use format::{FormatOptions, JsonOutput, OutputFormat, OutputFormatter, ellipsis};
pub use schedule::{Schedule, ScheduleDay};
pub use time::{DayWindow, EventDate};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
