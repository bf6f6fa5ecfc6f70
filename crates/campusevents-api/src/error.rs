//! Error types for events API operations.

use std::fmt;
use thiserror::Error;

/// The category of a fetch error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorCode {
    /// Connection failed, timed out, or the body could not be read.
    Network,
    /// The event does not exist (404).
    NotFound,
    /// The request was rejected (4xx other than 404).
    BadRequest,
    /// The server failed (5xx).
    ServerError,
    /// The response body was not what we expected.
    InvalidResponse,
    /// Missing or invalid client configuration.
    Configuration,
}

impl FetchErrorCode {
    /// Returns true if a manual retry might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network | Self::ServerError)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::NotFound => "not_found",
            Self::BadRequest => "bad_request",
            Self::ServerError => "server_error",
            Self::InvalidResponse => "invalid_response",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for FetchErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The events collaborator was unreachable or answered with a failure.
#[derive(Debug, Error)]
pub struct FetchError {
    code: FetchErrorCode,
    message: String,
    /// HTTP status, when the server answered.
    status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl FetchError {
    pub fn new(code: FetchErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::Network, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::BadRequest, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::ServerError, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::InvalidResponse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FetchErrorCode::Configuration, message)
    }

    /// Records the HTTP status the server answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> FetchErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn is_not_found(&self) -> bool {
        self.code == FetchErrorCode::NotFound
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(status) = self.status {
            write!(f, " (HTTP {})", status)?;
        }
        Ok(())
    }
}

/// A specialized Result type for events API operations.
pub type FetchResult<T> = Result<T, FetchError>;
