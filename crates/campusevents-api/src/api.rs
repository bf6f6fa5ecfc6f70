//! EventsApi trait definition.
//!
//! [`EventsApi`] is the seam between the client and whatever serves campus
//! events: the HTTP backend in production, an in-memory catalog in tests and
//! demos.

use std::future::Future;
use std::pin::Pin;

use campusevents_core::{EventRecord, NewEvent};

use crate::error::{FetchError, FetchResult};

/// Server-side narrowing of an event listing.
///
/// Both fields are optional; the client filters locally on top of whatever
/// the server returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    /// Free-text search term.
    pub search: Option<String>,
    /// Category name; `"all"` means no filtering.
    pub category: Option<String>,
}

impl EventQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the search term. Blank terms are ignored.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then_some(search);
        self
    }

    /// Builder method to set the category. Blank terms are ignored.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        let category = category.into();
        self.category = (!category.trim().is_empty()).then_some(category);
        self
    }

    /// Returns the query as URL parameters.
    pub fn to_params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::with_capacity(2);
        if let Some(ref search) = self.search {
            params.push(("search", search.as_str()));
        }
        if let Some(ref category) = self.category {
            params.push(("category", category.as_str()));
        }
        params
    }

    /// Returns true if `event` satisfies this query.
    ///
    /// Search is a case-insensitive substring match over the text fields;
    /// category is a case-insensitive exact match unless it is `"all"`.
    pub fn matches(&self, event: &EventRecord) -> bool {
        let search_ok = self
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .is_none_or(|needle| needle.is_empty() || event.matches_text(&needle));

        let category_ok = self.category.as_deref().is_none_or(|c| {
            c.eq_ignore_ascii_case("all") || event.category.to_lowercase() == c.to_lowercase()
        });

        search_ok && category_ok
    }
}

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so commands can hold a
/// `Box<dyn EventsApi>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The events collaborator.
pub trait EventsApi: Send + Sync {
    /// Returns the name of this backend (e.g., "http", "memory").
    fn name(&self) -> &str;

    /// Lists events, narrowed by `query`.
    fn list_events<'a>(&'a self, query: &'a EventQuery) -> BoxFuture<'a, FetchResult<Vec<EventRecord>>>;

    /// Fetches one event.
    ///
    /// # Errors
    ///
    /// Returns a `not_found` error if no event has this id.
    fn get_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>>;

    /// Creates an event and returns the stored record.
    ///
    /// The backend assigns `id` and starts `attendees` at zero.
    fn create_event<'a>(&'a self, event: &'a NewEvent) -> BoxFuture<'a, FetchResult<EventRecord>>;

    /// Registers one more attendee and returns the updated record.
    fn join_event<'a>(&'a self, id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>>;
}

/// An API that always fails with the same error.
///
/// Useful for testing error paths.
#[derive(Debug)]
pub struct ErrorApi {
    name: String,
    error: FetchError,
}

impl ErrorApi {
    pub fn new(name: impl Into<String>, error: FetchError) -> Self {
        Self {
            name: name.into(),
            error,
        }
    }

    fn fail<T: Send + 'static>(&self) -> BoxFuture<'_, FetchResult<T>> {
        // FetchError holds a boxed source and is not Clone.
        let mut error = FetchError::new(self.error.code(), self.error.message());
        if let Some(status) = self.error.status() {
            error = error.with_status(status);
        }
        Box::pin(async move { Err(error) })
    }
}

impl EventsApi for ErrorApi {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_events<'a>(&'a self, _query: &'a EventQuery) -> BoxFuture<'a, FetchResult<Vec<EventRecord>>> {
        self.fail()
    }

    fn get_event<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        self.fail()
    }

    fn create_event<'a>(&'a self, _event: &'a NewEvent) -> BoxFuture<'a, FetchResult<EventRecord>> {
        self.fail()
    }

    fn join_event<'a>(&'a self, _id: &'a str) -> BoxFuture<'a, FetchResult<EventRecord>> {
        self.fail()
    }
}
