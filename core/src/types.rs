//! Domain model and wire DTOs for the todo service.
//!
//! # Design
//! `TodoDto` is the exact JSON record the service exchanges. `Todo` is the
//! richer local entity: the service does not track timestamps, so they are
//! stamped locally whenever a record enters the collection or is mutated.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A todo record as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

/// Body of a creation request. The service assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoDto {
    pub title: String,
    pub completed: bool,
    pub user_id: i64,
}

/// A todo item held in the local collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Lift a wire record into the collection, stamping both timestamps.
    pub fn from_wire(dto: TodoDto, now: DateTime<Utc>) -> Self {
        Self {
            id: dto.id,
            title: dto.title,
            completed: dto.completed,
            created_at: now,
            updated_at: now,
        }
    }

    /// Build a fresh, incomplete todo for optimistic insertion.
    pub fn create(params: &CreateTodoParams, id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: params.title.clone(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full wire record for a replace request.
    pub fn to_wire(&self, user_id: i64) -> TodoDto {
        TodoDto {
            id: self.id,
            user_id,
            title: self.title.clone(),
            completed: self.completed,
        }
    }

    /// Copy with `updated_at` refreshed.
    ///
    /// The new stamp is strictly later than the previous one even when the
    /// clock has not advanced, and never earlier than `created_at`.
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        let floor = self.updated_at.max(self.created_at) + Duration::microseconds(1);
        Self {
            updated_at: now.max(floor),
            ..self.clone()
        }
    }
}

/// Caller input for `addTodo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTodoParams {
    pub title: String,
}

impl CreateTodoParams {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }
}

/// Caller input for `updateTodo`. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateTodoParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Which todos the visible list shows.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FilterOption {
    #[default]
    All,
    Active,
    Done,
}

impl FilterOption {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            FilterOption::All => true,
            FilterOption::Active => !todo.completed,
            FilterOption::Done => todo.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOption::All => "all",
            FilterOption::Active => "active",
            FilterOption::Done => "done",
        }
    }
}

impl FromStr for FilterOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(FilterOption::All),
            "active" => Ok(FilterOption::Active),
            "done" => Ok(FilterOption::Done),
            _ => Err(format!(
                "invalid filter '{s}'. Valid options: all, active, done"
            )),
        }
    }
}

impl fmt::Display for FilterOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering of the visible list.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SortOption {
    /// Ascending id.
    #[default]
    Id,
    /// Most recently updated first.
    Recent,
}

impl SortOption {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Id => "id",
            SortOption::Recent => "recent",
        }
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "id" => Ok(SortOption::Id),
            "recent" => Ok(SortOption::Recent),
            _ => Err(format!("invalid sort '{s}'. Valid options: id, recent")),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
