//! Event types for campus events.
//!
//! This module provides the core types for representing campus events:
//! - [`EventRecord`]: An event as served by the events API
//! - [`NewEvent`]: The payload for creating an event
//! - [`ValidationError`]: Field-level problems found in a [`NewEvent`]

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::time::EventDate;

/// A campus event as returned by the events API.
///
/// Records are read-only snapshots: filtering and sorting produce new
/// sequences and never mutate a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    /// Unique identifier for the event (assigned by the API).
    pub id: String,
    /// The event title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Display date, e.g. `"April 22, 2025"` or `"May 5-6, 2025"`.
    pub date: String,
    /// Display time, e.g. `"2:00 PM - 5:00 PM"` or `"Starts at 9:00 AM"`.
    pub time: String,
    /// Where the event takes place.
    pub location: String,
    /// Who organizes the event.
    pub organizer: String,
    /// Number of registered attendees.
    #[serde(default)]
    pub attendees: u32,
    /// Event category, e.g. `"Workshop"`.
    pub category: String,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Whether this event is the spotlight (featured) event.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub spotlight: bool,
}

impl EventRecord {
    /// Creates a new EventRecord with the identifying fields set and
    /// everything else empty.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            date: String::new(),
            time: String::new(),
            location: String::new(),
            organizer: String::new(),
            attendees: 0,
            category: String::new(),
            image_url: None,
            spotlight: false,
        }
    }

    /// Returns the parsed display date.
    pub fn event_date(&self) -> EventDate {
        EventDate::parse(&self.date)
    }

    /// Returns true if any searchable field contains `needle`.
    ///
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        [
            &self.title,
            &self.description,
            &self.organizer,
            &self.category,
            &self.location,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the display date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Builder method to set the display time.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = time.into();
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Builder method to set the organizer.
    pub fn with_organizer(mut self, organizer: impl Into<String>) -> Self {
        self.organizer = organizer.into();
        self
    }

    /// Builder method to set the attendee count.
    pub fn with_attendees(mut self, attendees: u32) -> Self {
        self.attendees = attendees;
        self
    }

    /// Builder method to set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder method to set the image URL.
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    /// Builder method to mark the event as spotlight.
    pub fn with_spotlight(mut self, spotlight: bool) -> Self {
        self.spotlight = spotlight;
        self
    }
}

/// Picks the event to feature.
///
/// The first spotlight event wins. Without one, the most attended event is
/// featured, keeping the earliest record on ties.
pub fn featured_event(events: &[EventRecord]) -> Option<&EventRecord> {
    events.iter().find(|e| e.spotlight).or_else(|| {
        events
            .iter()
            .fold(None, |best: Option<&EventRecord>, e| match best {
                Some(b) if b.attendees >= e.attendees => Some(b),
                _ => Some(e),
            })
    })
}

/// The payload for creating an event.
///
/// `id` and `attendees` are assigned by the events API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub organizer: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NewEvent {
    /// Checks the payload against the create-form rules.
    ///
    /// All failing fields are reported at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let rules: [(&'static str, &str, usize, &'static str); 7] = [
            ("title", &self.title, 3, "must be at least 3 characters"),
            ("description", &self.description, 10, "must be at least 10 characters"),
            ("date", &self.date, 1, "is required"),
            ("time", &self.time, 1, "is required"),
            ("location", &self.location, 3, "must be at least 3 characters"),
            ("organizer", &self.organizer, 3, "must be at least 3 characters"),
            ("category", &self.category, 1, "is required"),
        ];

        let issues: Vec<FieldIssue> = rules
            .into_iter()
            .filter(|(_, value, min, _)| value.trim().chars().count() < *min)
            .map(|(field, _, _, message)| FieldIssue { field, message })
            .collect();

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

/// One failing field of a [`NewEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// The field name.
    pub field: &'static str,
    /// What is wrong with it.
    pub message: &'static str,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// A [`NewEvent`] failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    /// Every failing field, in form order.
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid event: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl ValidationError {
    /// Returns true if `field` is among the failing fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workshop() -> EventRecord {
        EventRecord::new("event-1", "AI Workshop Series")
            .with_description("Learn the fundamentals of AI and machine learning.")
            .with_date("April 22, 2025")
            .with_time("2:00 PM - 5:00 PM")
            .with_location("Engineering Block, Room 302")
            .with_organizer("AI Club")
            .with_attendees(54)
            .with_category("Workshop")
    }

    mod event_record {
        use super::*;

        #[test]
        fn builder_pattern() {
            let event = workshop()
                .with_image_url("https://images.example.com/ai.jpg")
                .with_spotlight(true);

            assert_eq!(event.id, "event-1");
            assert_eq!(event.attendees, 54);
            assert_eq!(event.category, "Workshop");
            assert_eq!(
                event.image_url,
                Some("https://images.example.com/ai.jpg".to_string())
            );
            assert!(event.spotlight);
        }

        #[test]
        fn text_match_any_field() {
            let event = workshop();
            assert!(event.matches_text("ai workshop"));
            assert!(event.matches_text("machine learning"));
            assert!(event.matches_text("ai club"));
            assert!(event.matches_text("workshop"));
            assert!(event.matches_text("room 302"));
            assert!(!event.matches_text("hackathon"));
        }

        #[test]
        fn parsed_date() {
            let event = workshop();
            assert!(event.event_date().is_valid());

            let range = workshop().with_date("May 5-6, 2025");
            assert!(!range.event_date().is_valid());
        }

        #[test]
        fn serde_camel_case() {
            let event = workshop().with_image_url("https://img/1.jpg");
            let json = serde_json::to_value(&event).unwrap();
            assert_eq!(json["imageUrl"], "https://img/1.jpg");
            assert!(json.get("spotlight").is_none());

            let parsed: EventRecord = serde_json::from_value(json).unwrap();
            assert_eq!(parsed, event);
        }

        #[test]
        fn deserialize_api_payload() {
            let json = r#"{
                "id": "featured-1",
                "title": "Annual Tech Fest 2025",
                "description": "The biggest tech event of the year.",
                "date": "May 15, 2025",
                "time": "10:00 AM - 6:00 PM",
                "location": "Central Campus Auditorium",
                "organizer": "Computer Science Department",
                "attendees": 258,
                "category": "Technology",
                "spotlight": true
            }"#;
            let event: EventRecord = serde_json::from_str(json).unwrap();
            assert!(event.spotlight);
            assert_eq!(event.attendees, 258);
            assert!(event.image_url.is_none());
        }
    }

    mod featured {
        use super::*;

        #[test]
        fn spotlight_wins() {
            let events = vec![
                workshop().with_attendees(500),
                EventRecord::new("featured-1", "Tech Fest")
                    .with_attendees(10)
                    .with_spotlight(true),
            ];
            assert_eq!(featured_event(&events).unwrap().id, "featured-1");
        }

        #[test]
        fn falls_back_to_most_attended() {
            let events = vec![
                EventRecord::new("a", "A").with_attendees(54),
                EventRecord::new("b", "B").with_attendees(198),
                EventRecord::new("c", "C").with_attendees(198),
            ];
            assert_eq!(featured_event(&events).unwrap().id, "b");
        }

        #[test]
        fn empty_list() {
            assert!(featured_event(&[]).is_none());
        }
    }

    mod new_event {
        use super::*;

        fn valid() -> NewEvent {
            NewEvent {
                title: "Chess Night".to_string(),
                description: "Casual games for all skill levels.".to_string(),
                date: "June 3, 2025".to_string(),
                time: "7:00 PM - 9:00 PM".to_string(),
                location: "Library Hall".to_string(),
                organizer: "Chess Club".to_string(),
                category: "Social".to_string(),
                image_url: None,
            }
        }

        #[test]
        fn valid_payload() {
            assert!(valid().validate().is_ok());
        }

        #[test]
        fn reports_every_failing_field() {
            let payload = NewEvent {
                title: "AI".to_string(),
                description: "short".to_string(),
                category: "  ".to_string(),
                ..valid()
            };
            let err = payload.validate().unwrap_err();
            assert_eq!(err.issues.len(), 3);
            assert!(err.has_field("title"));
            assert!(err.has_field("description"));
            assert!(err.has_field("category"));
            assert!(!err.has_field("date"));
            assert_eq!(
                err.to_string(),
                "invalid event: title must be at least 3 characters, \
                 description must be at least 10 characters, category is required"
            );
        }

        #[test]
        fn serializes_without_id_or_attendees() {
            let json = serde_json::to_value(valid()).unwrap();
            assert!(json.get("id").is_none());
            assert!(json.get("attendees").is_none());
            assert!(json.get("imageUrl").is_none());
        }
    }
}
