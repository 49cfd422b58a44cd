//! Error types for the task list core.
//!
//! # Design
//! Every failure that comes back from the remote service is an `ApiError`:
//! bad statuses, transport faults and undecodable bodies all belong to the
//! same "network" kind and differ only in their message. `TodoError` adds the
//! two local failure kinds the store can raise before or instead of a
//! round-trip.

use thiserror::Error;

/// Failures of a single request/response exchange with the todo service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("API error: {status}")]
    Http { status: u16 },

    /// The request never produced a response (DNS, timeout, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("invalid request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status } => Some(*status),
            _ => None,
        }
    }
}

/// Errors returned by `TodoStore` operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoError {
    #[error(transparent)]
    Network(#[from] ApiError),

    /// The operation referenced an id absent from the local collection.
    #[error("Todo with id {0} not found")]
    NotFound(i64),

    /// Input rejected before any network call.
    #[error("{0}")]
    Validation(String),
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_carries_status() {
        let err = ApiError::Http { status: 503 };
        assert_eq!(err.to_string(), "API error: 503");
        assert_eq!(err.status(), Some(503));
    }

    #[test]
    fn transport_error_has_no_status() {
        let err = ApiError::Transport("connection reset".to_string());
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn network_todo_error_displays_api_message() {
        let err: TodoError = ApiError::Http { status: 404 }.into();
        assert_eq!(err.to_string(), "API error: 404");
    }

    #[test]
    fn not_found_message_names_id() {
        assert_eq!(TodoError::NotFound(7).to_string(), "Todo with id 7 not found");
    }
}
