//! Client error types.

use std::fmt;

use campusevents_api::FetchError;
use campusevents_core::{CalendarLinkError, ValidationError};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug)]
pub enum ClientError {
    /// Configuration error.
    Config(String),
    /// Events API error.
    Fetch(FetchError),
    /// Calendar link could not be built.
    Calendar(CalendarLinkError),
    /// Event form rejected before submission.
    Validation(ValidationError),
    /// IO error.
    Io(std::io::Error),
    /// Action failed (open, notify, etc).
    Action(String),
}

impl ClientError {
    /// Short title used for failure notifications.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration problem",
            Self::Fetch(_) => "Could not load events",
            Self::Calendar(_) => "Failed to add event to calendar",
            Self::Validation(_) => "Event not created",
            Self::Io(_) | Self::Action(_) => "Something went wrong",
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Fetch(err) => write!(f, "events API error: {}", err),
            Self::Calendar(err) => write!(f, "calendar error: {}", err),
            Self::Validation(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Action(msg) => write!(f, "action failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            Self::Calendar(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<FetchError> for ClientError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}

impl From<CalendarLinkError> for ClientError {
    fn from(err: CalendarLinkError) -> Self {
        Self::Calendar(err)
    }
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}
