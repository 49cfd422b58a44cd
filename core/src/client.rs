//! Request builder, response parser and round-trip driver for the todo API.
//!
//! # Design
//! `TodoClient` holds only the base URL and the owner tag sent with writes.
//! Each CRUD call is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`, so
//! the core stays free of I/O. `TodoApi` pairs a client with a `Transport`
//! and a `Clock` for callers that want a single call per operation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{CreateTodoParams, NewTodoDto, Todo, TodoDto};

/// Owner tag attached to every record this client writes.
pub const DEFAULT_USER_ID: i64 = 1;

/// Stateless client for the todo collection resource.
#[derive(Debug, Clone)]
pub struct TodoClient {
    base_url: String,
    user_id: i64,
}

impl TodoClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            user_id: DEFAULT_USER_ID,
        }
    }

    pub fn with_user_id(mut self, user_id: i64) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn build_fetch_all(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/todos", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create(&self, params: &CreateTodoParams) -> Result<HttpRequest, ApiError> {
        let body = NewTodoDto {
            title: params.title.clone(),
            completed: false,
            user_id: self.user_id,
        };
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/todos", self.base_url),
            headers: json_headers(),
            body: Some(encode(&body)?),
        })
    }

    pub fn build_update(&self, todo: &Todo) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/todos/{}", self.base_url, todo.id),
            headers: json_headers(),
            body: Some(encode(&todo.to_wire(self.user_id))?),
        })
    }

    pub fn build_delete(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/todos/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_fetch_all(
        &self,
        response: HttpResponse,
        now: DateTime<Utc>,
    ) -> Result<Vec<Todo>, ApiError> {
        check_status(&response)?;
        let records: Vec<TodoDto> = decode(&response.body)?;
        Ok(records
            .into_iter()
            .map(|dto| Todo::from_wire(dto, now))
            .collect())
    }

    pub fn parse_create(
        &self,
        response: HttpResponse,
        now: DateTime<Utc>,
    ) -> Result<Todo, ApiError> {
        check_status(&response)?;
        let record: TodoDto = decode(&response.body)?;
        Ok(Todo::from_wire(record, now))
    }

    /// Parse a replace response.
    ///
    /// The service does not track timestamps, so the result keeps the
    /// caller's `created_at` and is stamped with `now`.
    pub fn parse_update(
        &self,
        response: HttpResponse,
        original: &Todo,
        now: DateTime<Utc>,
    ) -> Result<Todo, ApiError> {
        check_status(&response)?;
        let record: TodoDto = decode(&response.body)?;
        Ok(Todo {
            created_at: original.created_at,
            updated_at: now,
            ..Todo::from_wire(record, now)
        })
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// A `TodoClient` bound to a transport and a clock.
#[derive(Debug, Clone)]
pub struct TodoApi<T, C> {
    client: TodoClient,
    transport: T,
    clock: C,
}

impl<T: Transport, C: Clock> TodoApi<T, C> {
    pub fn new(client: TodoClient, transport: T, clock: C) -> Self {
        Self {
            client,
            transport,
            clock,
        }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn fetch_all(&self) -> Result<Vec<Todo>, ApiError> {
        let response = self.send(self.client.build_fetch_all())?;
        let todos = self
            .client
            .parse_fetch_all(response, self.clock.now())
            .inspect_err(|e| warn!(error = %e, "failed to fetch todos"))?;
        debug!(count = todos.len(), "fetched todos");
        Ok(todos)
    }

    pub fn create(&self, params: &CreateTodoParams) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_create(params)?)?;
        self.client
            .parse_create(response, self.clock.now())
            .inspect_err(|e| warn!(error = %e, "failed to create todo"))
    }

    pub fn update(&self, todo: &Todo) -> Result<Todo, ApiError> {
        let response = self.send(self.client.build_update(todo)?)?;
        self.client
            .parse_update(response, todo, self.clock.now())
            .inspect_err(|e| warn!(id = todo.id, error = %e, "failed to update todo"))
    }

    pub fn delete(&self, id: i64) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete(id))?;
        self.client
            .parse_delete(response)
            .inspect_err(|e| warn!(id, error = %e, "failed to delete todo"))
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .inspect_err(|e| warn!(error = %e, "transport failure"))?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn encode<S: Serialize>(value: &S) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<D: DeserializeOwned>(body: &str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Any 2xx is success; everything else is reported with its status.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
    })
}
