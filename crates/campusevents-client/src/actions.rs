//! Event actions: open links, add to calendar, notify.

use std::fmt;
use std::time::Duration;

use notify_rust::Notification;
use tracing::{debug, info, warn};

use campusevents_core::{CalendarLink, CalendarLinkBuilder, EventRecord};

use crate::config::NotificationSettings;
use crate::error::{ClientError, ClientResult};

const APP_NAME: &str = "campusevents";

/// Opens a URL in the default browser.
pub fn open_url(url: &str) -> ClientResult<()> {
    info!(url = %url, "opening URL");
    open::that(url).map_err(|e| ClientError::Action(format!("failed to open URL: {}", e)))?;
    Ok(())
}

/// Outcome of a user-facing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A short message about an action's outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub summary: String,
    pub body: String,
}

impl Notice {
    pub fn success(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            summary: summary.into(),
            body: body.into(),
        }
    }

    pub fn failure(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Failure,
            summary: summary.into(),
            body: body.into(),
        }
    }

    /// The notice for a failed command.
    pub fn from_error(err: &ClientError) -> Self {
        Self::failure(err.summary(), err.to_string())
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "✓ {}", self.summary)?,
            NoticeKind::Failure => write!(f, "✗ {}", self.summary)?,
        }
        if !self.body.is_empty() {
            write!(f, ": {}", self.body)?;
        }
        Ok(())
    }
}

/// Reports action outcomes on the terminal and, optionally, the desktop.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    desktop: bool,
    timeout_secs: u32,
}

impl Notifier {
    pub fn new(settings: &NotificationSettings) -> Self {
        Self {
            desktop: settings.desktop,
            timeout_secs: settings.timeout_secs,
        }
    }

    /// Terminal only.
    pub fn quiet() -> Self {
        Self::default()
    }

    /// Prints the notice to stderr and sends a desktop notification when
    /// enabled. Stdout is left to command output.
    pub fn notify(&self, notice: &Notice) {
        eprintln!("{}", notice);
        self.send_desktop(notice);
    }

    /// Sends only the desktop notification, if enabled.
    pub fn send_desktop(&self, notice: &Notice) {
        if !self.desktop {
            return;
        }

        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&notice.summary)
            .body(&notice.body)
            .timeout(Duration::from_secs(u64::from(self.timeout_secs)));

        match notification.show() {
            Ok(_) => debug!(summary = %notice.summary, "desktop notification sent"),
            Err(e) => warn!(error = %e, "failed to send desktop notification"),
        }
    }
}

/// Builds the calendar link for `event`, opening it in the browser with
/// `open`.
///
/// Printing the link is left to the caller. Parse and browser failures are
/// reported through `notifier` and returned.
pub fn add_to_calendar(
    event: &EventRecord,
    builder: &CalendarLinkBuilder,
    open: bool,
    notifier: &Notifier,
) -> ClientResult<CalendarLink> {
    let result = builder
        .build_for(event)
        .map_err(ClientError::from)
        .and_then(|link| {
            if open {
                open_url(link.url.as_str())?;
            }
            Ok(link)
        });

    if let Some(notice) = calendar_notice(event, &result, open) {
        notifier.notify(&notice);
    }
    result
}

/// The notice for a calendar attempt; a link that was only built gets none.
fn calendar_notice(
    event: &EventRecord,
    result: &ClientResult<CalendarLink>,
    opened: bool,
) -> Option<Notice> {
    match result {
        Ok(_) if opened => Some(Notice::success(
            "Event added to your calendar!",
            event.title.clone(),
        )),
        Ok(_) => None,
        Err(e) => Some(Notice::failure(
            "Failed to add event to calendar",
            format!("{}: {}", event.title, e),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusevents_api::FetchError;

    fn workshop() -> EventRecord {
        EventRecord::new("event-1", "AI Workshop Series")
            .with_description("Learn the fundamentals of AI.")
            .with_date("April 22, 2025")
            .with_time("2:00 PM - 5:00 PM")
            .with_location("Engineering Block, Room 302")
    }

    #[test]
    fn notice_display() {
        let notice = Notice::success("Joined", "AI Workshop Series");
        assert_eq!(notice.to_string(), "✓ Joined: AI Workshop Series");

        let notice = Notice::failure("Event not created", "");
        assert_eq!(notice.to_string(), "✗ Event not created");
    }

    #[test]
    fn notice_from_error() {
        let err = ClientError::from(FetchError::network("could not connect to the events API"));
        let notice = Notice::from_error(&err);
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.summary, "Could not load events");
        assert!(notice.body.contains("could not connect"));
    }

    #[test]
    fn notifier_from_settings() {
        let settings = NotificationSettings {
            desktop: true,
            timeout_secs: 8,
        };
        let notifier = Notifier::new(&settings);
        assert!(notifier.desktop);
        assert_eq!(notifier.timeout_secs, 8);
        assert!(!Notifier::quiet().desktop);
    }

    #[test]
    fn add_to_calendar_builds_link() {
        let link = add_to_calendar(
            &workshop(),
            &CalendarLinkBuilder::new(),
            false,
            &Notifier::quiet(),
        )
        .unwrap();
        assert_eq!(link.dates(), "20250422T140000/20250422T170000");
    }

    #[test]
    fn add_to_calendar_reports_parse_failure() {
        let event = workshop().with_date("May 5-6, 2025");
        let err = add_to_calendar(&event, &CalendarLinkBuilder::new(), false, &Notifier::quiet())
            .unwrap_err();
        assert!(matches!(err, ClientError::Calendar(ref e) if e.is_date_parse()));
    }

    #[test]
    fn calendar_notices() {
        let event = workshop();
        let link = CalendarLinkBuilder::new().build_for(&event).map_err(ClientError::from);

        assert_eq!(calendar_notice(&event, &link, false), None);

        let notice = calendar_notice(&event, &link, true).unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.summary, "Event added to your calendar!");

        let browser = Err(ClientError::Action("failed to open URL: no browser".into()));
        let notice = calendar_notice(&event, &browser, true).unwrap();
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.summary, "Failed to add event to calendar");
        assert_eq!(
            notice.body,
            "AI Workshop Series: action failed: failed to open URL: no browser"
        );
    }
}
