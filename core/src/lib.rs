//! Task list core: model, API client, store and selectors.
//!
//! # Overview
//! Fetches, creates, edits, completes and deletes todo items against a
//! remote REST collection and keeps an optimistic local copy of it.
//!
//! # Design
//! - `TodoClient` is stateless and never touches the network: each call is a
//!   `build_*` that produces an `HttpRequest` and a `parse_*` that consumes an
//!   `HttpResponse`. The host plugs in a `Transport` to execute requests.
//! - `TodoStore` owns the collection state and exposes the operations as
//!   methods taking `&self`, so one store can be shared across threads.
//! - Selectors are pure; `SelectorCache` memoizes the visible list.

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http;
pub mod selectors;
pub mod store;
pub mod types;

pub use client::{TodoApi, TodoClient, DEFAULT_USER_ID};
pub use clock::{Clock, SystemClock};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, TodoError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use selectors::{SelectorCache, TodoStats};
pub use store::{TodoCollectionState, TodoStore};
pub use types::{
    CreateTodoParams, FilterOption, NewTodoDto, SortOption, Todo, TodoDto, UpdateTodoParams,
};
