//! HTTP client for the campus events backend.
//!
//! Endpoints, relative to the configured base URL:
//!
//! | Operation      | Request                         | Success           |
//! |----------------|---------------------------------|-------------------|
//! | list events    | `GET events?search=&category=`  | 200, JSON array   |
//! | get event      | `GET events/{id}`               | 200, JSON object  |
//! | create event   | `POST events` (JSON body)       | 201, JSON object  |
//! | join event     | `POST events/{id}/join`         | 200, JSON object  |

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};

use campusevents_core::{EventRecord, NewEvent};

use crate::api::{BoxFuture, EventQuery, EventsApi};
use crate::config::ApiConfig;
use crate::error::{FetchError, FetchResult};

/// [`EventsApi`] backed by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    client: Client,
    config: ApiConfig,
}

impl HttpEventsApi {
    /// Creates a new client with the given configuration.
    pub fn new(config: ApiConfig) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                FetchError::configuration("failed to create HTTP client").with_source(e)
            })?;

        Ok(Self { client, config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Path of a single event, with the id percent-encoded as one segment.
    fn event_path(id: &str, suffix: &str) -> String {
        let mut path = format!("events/{}", encode_segment(id));
        if !suffix.is_empty() {
            path.push('/');
            path.push_str(suffix);
        }
        path
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> FetchResult<T> {
        let response = request.send().await.map_err(|e| {
            let message = if e.is_timeout() {
                "request timed out"
            } else if e.is_connect() {
                "could not connect to the events API"
            } else {
                "request failed"
            };
            FetchError::network(message).with_source(e)
        })?;

        self.handle_response(response, expected).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        expected: StatusCode,
    ) -> FetchResult<T> {
        let status = response.status();
        trace!(status = %status, url = %response.url(), "received response");

        if status == expected || (expected == StatusCode::OK && status.is_success()) {
            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::network("failed to read response body").with_source(e))?;
            return serde_json::from_slice(&body).map_err(|e| {
                FetchError::invalid_response("unexpected response body")
                    .with_status(status.as_u16())
                    .with_source(e)
            });
        }

        let body = response.text().await.unwrap_or_default();
        let error = match status {
            StatusCode::NOT_FOUND => FetchError::not_found(server_message(&body, "event not found")),
            s if s.is_client_error() => {
                FetchError::bad_request(server_message(&body, "request rejected"))
            }
            s if s.is_server_error() => FetchError::server(server_message(&body, "server error")),
            s => {
                warn!(status = %s, body = %body, "unexpected response status");
                FetchError::invalid_response(format!("unexpected status {}", s))
            }
        };
        Err(error.with_status(status.as_u16()))
    }
}

/// Extracts `{"error": "..."}` from a failure body, or falls back.
fn server_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.as_str().map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}

/// Percent-encodes a path segment.
fn encode_segment(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

impl EventsApi for HttpEventsApi {
    fn name(&self) -> &str {
        "http"
    }

    fn list_events<'a>(&'a self, query: &'a EventQuery) -> BoxFuture<'a, FetchResult<Vec<EventRecord>>> {
        Box::pin(async move {
            let url = self.config.endpoint("events")?;
            debug!(url = %url, ?query, "listing events");
            let request = self.client.get(url).query(&query.to_params());
            let events: Vec<EventRecord> = self.send(request, StatusCode::OK).await?;
            debug!(count = events.len(), "fetched events");
            Ok(events)
        })
    }

    fn get_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            let url = self.config.endpoint(&Self::event_path(id, ""))?;
            debug!(url = %url, "fetching event");
            self.send(self.client.get(url), StatusCode::OK).await
        })
    }

    fn create_event<'a>(&'a self, event: &'a NewEvent) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            let url = self.config.endpoint("events")?;
            debug!(url = %url, title = %event.title, "creating event");
            self.send(self.client.post(url).json(event), StatusCode::CREATED)
                .await
        })
    }

    fn join_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        Box::pin(async move {
            let url = self.config.endpoint(&Self::event_path(id, "join"))?;
            debug!(url = %url, "joining event");
            self.send(self.client.post(url), StatusCode::OK).await
        })
    }
}
