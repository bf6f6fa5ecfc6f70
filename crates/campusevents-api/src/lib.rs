//! EventsApi trait and implementations.
//!
//! - [`EventsApi`] - the events collaborator: list, get, create, join
//! - [`HttpEventsApi`] - talks to the REST backend
//! - [`InMemoryEventsApi`] - the sample catalog for demos and tests
//! - [`FetchError`] - what goes wrong talking to either
//!
//! ```text
//!  ┌──────────────┐      ┌───────────────┐
//!  │ REST backend │      │ sample events │
//!  └──────┬───────┘      └───────┬───────┘
//!         ▼                      ▼
//!  ┌──────────────┐      ┌───────────────────┐
//!  │HttpEventsApi │      │ InMemoryEventsApi │
//!  └──────┬───────┘      └─────────┬─────────┘
//!         └──────── EventsApi ─────┘
//!                      │
//!                      ▼
//!               Vec<EventRecord>
//! ```

pub mod api;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;

pub use api::{BoxFuture, ErrorApi, EventQuery, EventsApi};
pub use config::ApiConfig;
pub use error::{FetchError, FetchErrorCode, FetchResult};
#[cfg(feature = "http")]
pub use http::HttpEventsApi;
pub use memory::{InMemoryEventsApi, sample_events};
