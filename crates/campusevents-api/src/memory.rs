//! In-memory events backend.
//!
//! Mirrors the REST backend's behavior over a `Vec` guarded by a lock. Used
//! by `--demo` mode and in tests.

use tokio::sync::RwLock;
use tracing::debug;

use campusevents_core::{EventRecord, NewEvent};

use crate::api::{BoxFuture, EventQuery, EventsApi};
use crate::error::{FetchError, FetchResult};

/// [`EventsApi`] over an in-memory event list.
#[derive(Debug, Default)]
pub struct InMemoryEventsApi {
    events: RwLock<Vec<EventRecord>>,
}

impl InMemoryEventsApi {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// A backend preloaded with [`sample_events`].
    pub fn with_samples() -> Self {
        Self::new(sample_events())
    }

    /// Returns a copy of every stored event.
    pub async fn snapshot(&self) -> Vec<EventRecord> {
        self.events.read().await.clone()
    }
}

/// Picks `event-<n>` with the smallest `n` above the list length that is
/// not taken yet.
fn next_id(events: &[EventRecord]) -> String {
    (events.len() + 1..)
        .map(|n| format!("event-{}", n))
        .find(|id| events.iter().all(|e| &e.id != id))
        .unwrap_or_default()
}

impl EventsApi for InMemoryEventsApi {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_events<'a>(&'a self, query: &'a EventQuery) -> BoxFuture<'a, FetchResult<Vec<EventRecord>>> {
        Box::pin(async move {
            let events = self.events.read().await;
            Ok(events.iter().filter(|e| query.matches(e)).cloned().collect())
        })
    }

    fn get_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            self.events
                .read()
                .await
                .iter()
                .find(|e| e.id == id)
                .cloned()
                .ok_or_else(|| FetchError::not_found(format!("event {} not found", id)))
        })
    }

    fn create_event<'a>(&'a self, event: &'a NewEvent) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            let mut events = self.events.write().await;
            let mut record = EventRecord::new(next_id(&events), event.title.clone())
                .with_description(event.description.clone())
                .with_date(event.date.clone())
                .with_time(event.time.clone())
                .with_location(event.location.clone())
                .with_organizer(event.organizer.clone())
                .with_category(event.category.clone());
            record.image_url = event.image_url.clone();

            debug!(id = %record.id, title = %record.title, "stored event");
            events.push(record.clone());
            Ok(record)
        })
    }

    fn join_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            let mut events = self.events.write().await;
            let event = events
                .iter_mut()
                .find(|e| e.id == id)
                .ok_or_else(|| FetchError::not_found(format!("event {} not found", id)))?;
            event.attendees = event.attendees.saturating_add(1);
            Ok(event.clone())
        })
    }
}

/// The sample campus catalog.
pub fn sample_events() -> Vec<EventRecord> {
    vec![
        EventRecord::new("event-1", "AI Workshop Series")
            .with_description(
                "Learn the fundamentals of AI and machine learning in this hands-on workshop series.",
            )
            .with_date("April 22, 2025")
            .with_time("2:00 PM - 5:00 PM")
            .with_location("Engineering Block, Room 302")
            .with_organizer("AI Club")
            .with_attendees(54)
            .with_category("Workshop"),
        EventRecord::new("event-2", "Spring Cultural Night")
            .with_description("Experience diverse cultures through performances, music, food, and more.")
            .with_date("April 25, 2025")
            .with_time("6:00 PM - 10:00 PM")
            .with_location("Student Center")
            .with_organizer("Cultural Committee")
            .with_attendees(142)
            .with_category("Cultural"),
        EventRecord::new("event-3", "Career Fair 2025")
            .with_description(
                "Connect with top employers from various industries looking to hire fresh talent.",
            )
            .with_date("April 27, 2025")
            .with_time("9:00 AM - 4:00 PM")
            .with_location("Business School Atrium")
            .with_organizer("Career Services")
            .with_attendees(198)
            .with_category("Career"),
        EventRecord::new("event-4", "Startup Pitch Competition")
            .with_description(
                "Pitch your innovative business ideas to a panel of investors and entrepreneurs.",
            )
            .with_date("May 2, 2025")
            .with_time("1:00 PM - 5:00 PM")
            .with_location("Innovation Hub")
            .with_organizer("Entrepreneurship Club")
            .with_attendees(76)
            .with_category("Business"),
        EventRecord::new("trending-1", "Photography Exhibition")
            .with_description(
                "An exhibition showcasing the best photographs taken by students around campus.",
            )
            .with_date("April 23, 2025")
            .with_time("11:00 AM - 7:00 PM")
            .with_location("Art Gallery")
            .with_organizer("Photography Club")
            .with_attendees(89)
            .with_category("Arts"),
        EventRecord::new("trending-2", "Debate Championship")
            .with_description(
                "Annual inter-college debate competition on contemporary social and political issues.",
            )
            .with_date("April 29, 2025")
            .with_time("10:00 AM - 6:00 PM")
            .with_location("Main Auditorium")
            .with_organizer("Debate Society")
            .with_attendees(112)
            .with_category("Academic"),
        EventRecord::new("trending-3", "Hackathon 2025")
            .with_description("24-hour coding marathon to solve real-world problems with technology.")
            .with_date("May 5-6, 2025")
            .with_time("Starts at 9:00 AM")
            .with_location("CS Department Labs")
            .with_organizer("Developer Student Club")
            .with_attendees(176)
            .with_category("Technology"),
        EventRecord::new("featured-1", "Annual Tech Fest 2025")
            .with_description(
                "Join us for the biggest tech event of the year with workshops, hackathons, \
                 and exciting tech talks from industry leaders.",
            )
            .with_date("May 15, 2025")
            .with_time("10:00 AM - 6:00 PM")
            .with_location("Central Campus Auditorium")
            .with_organizer("Computer Science Department")
            .with_attendees(258)
            .with_category("Technology")
            .with_spotlight(true),
    ]
}
