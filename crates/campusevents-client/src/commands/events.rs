//! Event commands.

use std::io::Write;

use serde::Serialize;
use tracing::{debug, info};

use campusevents_api::EventQuery;
use campusevents_core::{
    CalendarLink, CalendarLinkBuilder, EventDate, EventFilter, EventRecord, FilterCriteria,
    NewEvent, Schedule, featured_event,
};

use super::Context;
use crate::actions::{Notice, add_to_calendar};
use crate::error::ClientResult;

/// JSON view of a calendar link.
#[derive(Debug, Serialize)]
struct LinkView {
    url: String,
    dates: String,
}

impl From<&CalendarLink> for LinkView {
    fn from(link: &CalendarLink) -> Self {
        Self {
            url: link.url.to_string(),
            dates: link.dates(),
        }
    }
}

/// JSON output of `join`.
#[derive(Debug, Serialize)]
struct Registration<'a> {
    event: &'a EventRecord,
    calendar: Option<LinkView>,
}

/// Lists events matching `criteria`.
///
/// The search term and category are sent to the API; the full filter runs
/// locally on whatever comes back, so a backend that ignores them still
/// yields the right list.
pub async fn list(
    ctx: &Context<'_>,
    criteria: FilterCriteria,
    limit: Option<usize>,
    out: &mut dyn Write,
) -> ClientResult<()> {
    let mut query = EventQuery::new().with_search(criteria.search_query.clone());
    if !criteria.is_all_categories() {
        query = query.with_category(criteria.category.clone());
    }

    let fetched = ctx.api.list_events(&query).await?;
    let mut events = EventFilter::new(criteria).apply(&fetched, ctx.today);
    if let Some(limit) = limit {
        events.truncate(limit);
    }
    debug!(fetched = fetched.len(), shown = events.len(), api = ctx.api.name(), "listed events");

    ctx.emit(
        out,
        || ctx.formatter.format_events(&events),
        &ctx.formatter.format_json(&events),
    )
}

/// Shows one event in full.
pub async fn show(ctx: &Context<'_>, id: &str, out: &mut dyn Write) -> ClientResult<()> {
    let event = ctx.api.get_event(id).await?;
    ctx.emit(out, || ctx.formatter.format_event_detail(&event), &event)
}

/// Shows the featured event, if any.
pub async fn featured(ctx: &Context<'_>, out: &mut dyn Write) -> ClientResult<()> {
    let events = ctx.api.list_events(&EventQuery::new()).await?;
    let featured = featured_event(&events);
    ctx.emit(
        out,
        || match featured {
            Some(event) => ctx.formatter.format_event_detail(event),
            None => campusevents_core::format::NO_EVENTS_HINT.to_string(),
        },
        &featured,
    )
}

/// Shows events grouped by day.
///
/// Past events are dropped unless `include_past` is set. Events whose date
/// does not parse are always kept, at the end.
pub async fn upcoming(ctx: &Context<'_>, include_past: bool, out: &mut dyn Write) -> ClientResult<()> {
    let events = ctx.api.list_events(&EventQuery::new()).await?;
    let kept: Vec<EventRecord> = events
        .into_iter()
        .filter(|e| include_past || is_upcoming(&e.event_date(), ctx.today))
        .collect();

    let schedule = Schedule::build(&kept, ctx.today);
    ctx.emit(
        out,
        || ctx.formatter.format_schedule(&schedule),
        &schedule,
    )
}

fn is_upcoming(date: &EventDate, today: chrono::NaiveDate) -> bool {
    date.as_date().is_none_or(|d| d >= today)
}

/// Validates and creates an event.
pub async fn create(ctx: &Context<'_>, event: NewEvent, out: &mut dyn Write) -> ClientResult<()> {
    if let Err(e) = event.validate() {
        ctx.notifier.notify(&Notice::failure("Event not created", e.to_string()));
        return Err(e.into());
    }

    let created = ctx.api.create_event(&event).await?;
    info!(id = %created.id, title = %created.title, "created event");
    ctx.emit(out, || ctx.formatter.format_event_detail(&created), &created)?;
    ctx.notifier
        .notify(&Notice::success("Event created", created.title.clone()));
    Ok(())
}

/// Registers for an event, then offers the calendar link.
///
/// A calendar failure after a successful registration is reported but does
/// not undo the registration.
pub async fn join(
    ctx: &Context<'_>,
    id: &str,
    calendar: Option<(&CalendarLinkBuilder, bool)>,
    out: &mut dyn Write,
) -> ClientResult<()> {
    let event = ctx.api.join_event(id).await?;
    info!(id = %event.id, attendees = event.attendees, "joined event");
    ctx.notifier.notify(&Notice::success(
        "Successfully registered for event!",
        event.title.clone(),
    ));

    let (link, failure) = match calendar {
        Some((builder, open)) => match add_to_calendar(&event, builder, open, &ctx.notifier) {
            Ok(link) => (Some(link), None),
            Err(e) => (None, Some(e)),
        },
        None => (None, None),
    };

    let registration = Registration {
        event: &event,
        calendar: link.as_ref().map(LinkView::from),
    };
    ctx.emit(
        out,
        || {
            let mut text =
                format!("Registered for {} ({} attending)", event.title, event.attendees);
            if let Some(ref link) = link {
                text.push('\n');
                text.push_str(link.url.as_str());
            }
            text
        },
        &registration,
    )?;

    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Prints (and optionally opens) the calendar link for an event.
pub async fn calendar_link(
    ctx: &Context<'_>,
    id: &str,
    builder: &CalendarLinkBuilder,
    open: bool,
    out: &mut dyn Write,
) -> ClientResult<()> {
    let event = ctx.api.get_event(id).await?;
    let link = add_to_calendar(&event, builder, open, &ctx.notifier)?;
    ctx.emit(out, || link.url.to_string(), &LinkView::from(&link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusevents_api::{ErrorApi, EventsApi, FetchError, InMemoryEventsApi};
    use campusevents_core::{OutputFormat, SortKey, Tab};
    use chrono::NaiveDate;

    use crate::error::ClientError;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn render(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    mod listing {
        use super::*;

        #[tokio::test]
        async fn popular_technology() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));
            let criteria = FilterCriteria::default()
                .with_category("technology")
                .with_sort(SortKey::Popular);

            let mut out: Vec<u8> = Vec::new();
            list(&ctx, criteria, None, &mut out).await.unwrap();
            let text = render(out);

            let tech_fest = text.find("Annual Tech Fest 2025").unwrap();
            let hackathon = text.find("Hackathon 2025").unwrap();
            assert!(tech_fest < hackathon);
            assert!(!text.contains("Career Fair"));
        }

        #[tokio::test]
        async fn week_tab_json() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);
            let criteria = FilterCriteria::default()
                .with_tab(Tab::Week)
                .with_sort(SortKey::Oldest);

            let mut out: Vec<u8> = Vec::new();
            list(&ctx, criteria, None, &mut out).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

            let ids: Vec<&str> = value["events"]
                .as_array()
                .unwrap()
                .iter()
                .map(|e| e["id"].as_str().unwrap())
                .collect();
            assert_eq!(
                ids,
                vec!["event-1", "trending-1", "event-2", "event-3", "trending-2"]
            );
            assert_eq!(value["count"], 5);
        }

        #[tokio::test]
        async fn limit_and_empty_hint() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            list(&ctx, FilterCriteria::default(), Some(1), &mut out)
                .await
                .unwrap();
            let text = render(out);
            // Unparseable dates lead under newest.
            assert!(text.starts_with("Hackathon 2025 [Technology]"));
            assert!(!text.contains("Annual Tech Fest"));

            let mut out: Vec<u8> = Vec::new();
            let criteria = FilterCriteria::default().with_search("quidditch");
            list(&ctx, criteria, None, &mut out).await.unwrap();
            assert_eq!(
                render(out).trim_end(),
                "No events found. Try adjusting your search or filters."
            );
        }

        #[tokio::test]
        async fn fetch_failure_propagates() {
            let api = ErrorApi::new("down", FetchError::network("could not connect"));
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            let err = list(&ctx, FilterCriteria::default(), None, &mut out)
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Fetch(ref e) if e.is_retryable()));
            assert!(out.is_empty());
        }
    }

    mod single {
        use super::*;

        #[tokio::test]
        async fn show_detail() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            show(&ctx, "event-3", &mut out).await.unwrap();
            let text = render(out);
            assert!(text.starts_with("Career Fair 2025 [Career]"));
            assert!(text.contains("id: event-3"));
        }

        #[tokio::test]
        async fn show_missing() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let err = show(&ctx, "nope", &mut Vec::<u8>::new()).await.unwrap_err();
            assert!(matches!(err, ClientError::Fetch(ref e) if e.is_not_found()));
        }

        #[tokio::test]
        async fn featured_prefers_spotlight() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);

            let mut out: Vec<u8> = Vec::new();
            featured(&ctx, &mut out).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["id"], "featured-1");
        }

        #[tokio::test]
        async fn featured_empty_catalog() {
            let api = InMemoryEventsApi::new(Vec::new());
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            featured(&ctx, &mut out).await.unwrap();
            assert!(render(out).starts_with("No events found."));
        }
    }

    mod schedule {
        use super::*;

        #[tokio::test]
        async fn upcoming_drops_past_keeps_unparsed() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 28)).with_format(OutputFormat::Json);

            let mut out: Vec<u8> = Vec::new();
            upcoming(&ctx, false, &mut out).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

            let dates: Vec<&str> = value["days"]
                .as_array()
                .unwrap()
                .iter()
                .map(|d| d["date"].as_str().unwrap())
                .collect();
            assert_eq!(
                dates,
                vec!["April 29, 2025", "May 2, 2025", "May 15, 2025", "May 5-6, 2025"]
            );
        }

        #[tokio::test]
        async fn upcoming_all_keeps_past() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 28));

            let mut out: Vec<u8> = Vec::new();
            upcoming(&ctx, true, &mut out).await.unwrap();
            assert!(render(out).contains("April 22, 2025"));
        }

        #[test]
        fn upcoming_predicate() {
            let today = day(2025, 4, 28);
            assert!(is_upcoming(&EventDate::parse("April 28, 2025"), today));
            assert!(!is_upcoming(&EventDate::parse("April 27, 2025"), today));
            assert!(is_upcoming(&EventDate::Invalid, today));
        }
    }

    mod mutations {
        use super::*;

        fn chess_night() -> NewEvent {
            NewEvent {
                title: "Chess Night".into(),
                description: "Casual games for all skill levels.".into(),
                date: "June 3, 2025".into(),
                time: "7:00 PM - 9:00 PM".into(),
                location: "Library Hall".into(),
                organizer: "Chess Club".into(),
                category: "Social".into(),
                image_url: None,
            }
        }

        #[tokio::test]
        async fn create_stores_event() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            create(&ctx, chess_night(), &mut out).await.unwrap();
            assert!(render(out).starts_with("Chess Night [Social]"));

            let stored = api.snapshot().await;
            assert_eq!(stored.len(), 9);
            assert_eq!(stored[8].id, "event-9");
        }

        #[tokio::test]
        async fn create_rejects_invalid_before_sending() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));
            let event = NewEvent {
                title: "Go".into(),
                ..chess_night()
            };

            let err = create(&ctx, event, &mut Vec::<u8>::new()).await.unwrap_err();
            assert!(matches!(err, ClientError::Validation(ref e) if e.has_field("title")));
            assert_eq!(api.snapshot().await.len(), 8);
        }

        #[tokio::test]
        async fn join_without_calendar() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            join(&ctx, "event-1", None, &mut out).await.unwrap();
            assert_eq!(
                render(out).trim_end(),
                "Registered for AI Workshop Series (55 attending)"
            );
        }

        #[tokio::test]
        async fn join_prints_calendar_link() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));
            let builder = CalendarLinkBuilder::new();

            let mut out: Vec<u8> = Vec::new();
            join(&ctx, "event-1", Some((&builder, false)), &mut out)
                .await
                .unwrap();
            let text = render(out);
            let mut lines = text.lines();
            assert_eq!(
                lines.next(),
                Some("Registered for AI Workshop Series (55 attending)")
            );
            let url = lines.next().unwrap();
            assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE&"));
            assert!(url.contains("dates=20250422T140000/20250422T170000"));
            assert_eq!(lines.next(), None);
        }

        #[tokio::test]
        async fn join_json_is_one_document() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);
            let builder = CalendarLinkBuilder::new();

            let mut out: Vec<u8> = Vec::new();
            join(&ctx, "event-1", None, &mut out).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["event"]["id"], "event-1");
            assert_eq!(value["event"]["attendees"], 55);
            assert!(value["calendar"].is_null());

            let mut out: Vec<u8> = Vec::new();
            join(&ctx, "event-1", Some((&builder, false)), &mut out)
                .await
                .unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["event"]["attendees"], 56);
            assert_eq!(value["calendar"]["dates"], "20250422T140000/20250422T170000");
            assert!(
                value["calendar"]["url"]
                    .as_str()
                    .unwrap()
                    .starts_with("https://calendar.google.com/")
            );
        }

        #[tokio::test]
        async fn join_keeps_registration_when_calendar_fails() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);
            let builder = CalendarLinkBuilder::new();

            let mut out: Vec<u8> = Vec::new();
            let err = join(&ctx, "trending-3", Some((&builder, false)), &mut out)
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Calendar(_)));
            assert_eq!(api.get_event("trending-3").await.unwrap().attendees, 177);

            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["event"]["id"], "trending-3");
            assert!(value["calendar"].is_null());
        }

        #[tokio::test]
        async fn create_json_is_one_document() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);

            let mut out: Vec<u8> = Vec::new();
            create(&ctx, chess_night(), &mut out).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["id"], "event-9");
            assert_eq!(value["title"], "Chess Night");
        }

        #[tokio::test]
        async fn calendar_link_for_sample() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let mut out: Vec<u8> = Vec::new();
            calendar_link(&ctx, "event-2", &CalendarLinkBuilder::new(), false, &mut out)
                .await
                .unwrap();
            let text = render(out);
            assert!(text.starts_with("https://calendar.google.com/calendar/render?"));
            assert!(text.contains("dates=20250425T180000/20250425T220000"));

            let err = calendar_link(
                &ctx,
                "missing",
                &CalendarLinkBuilder::new(),
                false,
                &mut Vec::<u8>::new(),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ClientError::Fetch(_)));
        }

        #[tokio::test]
        async fn calendar_link_json() {
            let api = InMemoryEventsApi::with_samples();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);

            let mut out: Vec<u8> = Vec::new();
            calendar_link(&ctx, "event-1", &CalendarLinkBuilder::new(), false, &mut out)
                .await
                .unwrap();
            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["dates"], "20250422T140000/20250422T170000");
            assert!(value["url"].as_str().unwrap().contains("action=TEMPLATE"));
        }
    }

    #[cfg(feature = "http")]
    mod http_backend {
        use super::*;
        use campusevents_api::HttpEventsApi;
        use serde_json::json;
        use wiremock::matchers::{method, path, query_param};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use crate::config::ClientConfig;

        #[tokio::test]
        async fn list_narrows_on_server_and_filters_locally() {
            let server = MockServer::start().await;
            // The backend ignores the category and returns everything.
            Mock::given(method("GET"))
                .and(path("/api/events"))
                .and(query_param("category", "Career"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                    {"id": "event-1", "title": "AI Workshop Series", "description": "",
                     "date": "April 22, 2025", "time": "2:00 PM - 5:00 PM", "location": "",
                     "organizer": "AI Club", "attendees": 54, "category": "Workshop"},
                    {"id": "event-3", "title": "Career Fair 2025", "description": "",
                     "date": "April 27, 2025", "time": "9:00 AM - 4:00 PM", "location": "",
                     "organizer": "Career Services", "attendees": 198, "category": "Career"}
                ])))
                .expect(1)
                .mount(&server)
                .await;

            let mut config = ClientConfig::default();
            config.api.base_url = format!("{}/api", server.uri());
            let api = HttpEventsApi::new(config.api_config(None).unwrap()).unwrap();
            let ctx = Context::new(&api, day(2025, 4, 22)).with_format(OutputFormat::Json);

            let mut out: Vec<u8> = Vec::new();
            let criteria = FilterCriteria::default().with_category("Career");
            list(&ctx, criteria, None, &mut out).await.unwrap();

            let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
            assert_eq!(value["count"], 1);
            assert_eq!(value["events"][0]["id"], "event-3");
        }

        #[tokio::test]
        async fn join_not_found() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/events/event-99/join"))
                .respond_with(
                    ResponseTemplate::new(404).set_body_json(json!({"error": "Event not found"})),
                )
                .mount(&server)
                .await;

            let mut config = ClientConfig::default();
            config.api.base_url = format!("{}/api", server.uri());
            let api = HttpEventsApi::new(config.api_config(None).unwrap()).unwrap();
            let ctx = Context::new(&api, day(2025, 4, 22));

            let err = join(&ctx, "event-99", None, &mut Vec::<u8>::new())
                .await
                .unwrap_err();
            assert!(matches!(err, ClientError::Fetch(ref e) if e.is_not_found()));
            assert_eq!(err.to_string(), "events API error: not_found: Event not found (HTTP 404)");
        }
    }
}
