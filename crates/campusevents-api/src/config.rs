//! Events API connection settings.

use std::time::Duration;
use url::Url;

use crate::error::{FetchError, FetchResult};

/// Configuration for the HTTP events API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `http://localhost:5000/api`.
    pub base_url: Url,

    /// Request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:5000/api";

    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Creates a configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL does not parse or cannot be
    /// used as a base.
    pub fn new(base_url: impl AsRef<str>) -> FetchResult<Self> {
        let raw = base_url.as_ref().trim();
        // Keep a trailing slash so that joining "events" appends to the path.
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{}/", raw)
        };
        let url = Url::parse(&normalized).map_err(|e| {
            FetchError::configuration(format!("invalid API URL {:?}", raw)).with_source(e)
        })?;
        if url.cannot_be_a_base() {
            return Err(FetchError::configuration(format!(
                "API URL {:?} cannot be used as a base",
                raw
            )));
        }

        Ok(Self {
            base_url: url,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("campusevents/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolves `path` (without a leading slash) against the base URL.
    pub fn endpoint(&self, path: &str) -> FetchResult<Url> {
        self.base_url.join(path).map_err(|e| {
            FetchError::configuration(format!("invalid endpoint path {:?}", path)).with_source(e)
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://localhost:5000/api/").expect("valid default URL"),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("campusevents/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_trailing_slash() {
        let config = ApiConfig::new("http://localhost:5000/api").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:5000/api/");
        assert_eq!(
            config.endpoint("events").unwrap().as_str(),
            "http://localhost:5000/api/events"
        );
    }

    #[test]
    fn endpoint_with_id() {
        let config = ApiConfig::new("https://events.example.edu/api/").unwrap();
        assert_eq!(
            config.endpoint("events/event-1/join").unwrap().as_str(),
            "https://events.example.edu/api/events/event-1/join"
        );
    }

    #[test]
    fn builder_methods() {
        let config = ApiConfig::new("http://localhost:5000/api")
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_user_agent("tests");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "tests");
    }

    #[test]
    fn default_matches_constant() {
        let config = ApiConfig::default();
        assert_eq!(
            config.base_url.as_str(),
            format!("{}/", ApiConfig::DEFAULT_BASE_URL)
        );
    }

    #[test]
    fn invalid_url_returns_error() {
        let err = ApiConfig::new("not a valid url").unwrap_err();
        assert_eq!(err.code(), crate::error::FetchErrorCode::Configuration);

        assert!(ApiConfig::new("mailto:events@example.edu").is_err());
    }
}
