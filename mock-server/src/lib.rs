use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

/// Full replacement record. The path id wins over any id in the body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceTodo {
    pub title: String,
    pub completed: bool,
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

fn default_user_id() -> i64 {
    1
}

/// Keyed by id so listings come back in ascending id order.
pub type Db = Arc<RwLock<BTreeMap<i64, Todo>>>;

pub fn app() -> Router {
    app_with(Vec::new())
}

pub fn app_with(seed: Vec<Todo>) -> Router {
    let db: Db = Arc::new(RwLock::new(
        seed.into_iter().map(|todo| (todo.id, todo)).collect(),
    ));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(replace_todo).delete(delete_todo))
        .with_state(db)
}

/// A handful of records for local runs.
pub fn fixtures() -> Vec<Todo> {
    ["delectus aut autem", "quis ut nam facilis", "fugiat veniam minus"]
        .into_iter()
        .zip(1..)
        .map(|(title, id)| Todo {
            id,
            user_id: 1,
            title: title.to_string(),
            completed: id == 2,
        })
        .collect()
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, seed: Vec<Todo>) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(seed)).await
}

async fn list_todos(State(db): State<Db>) -> Json<Vec<Todo>> {
    let todos = db.read().await;
    Json(todos.values().cloned().collect())
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let mut todos = db.write().await;
    let id = todos.keys().next_back().map_or(1, |max| max + 1);
    let todo = Todo {
        id,
        user_id: input.user_id,
        title: input.title,
        completed: input.completed,
    };
    todos.insert(id, todo.clone());
    debug!(id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn get_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, StatusCode> {
    let todos = db.read().await;
    todos.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_todo(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ReplaceTodo>,
) -> Json<Todo> {
    let todo = Todo {
        id,
        user_id: input.user_id,
        title: input.title,
        completed: input.completed,
    };
    db.write().await.insert(id, todo.clone());
    debug!(id, "replaced todo");
    Json(todo)
}

/// Answers `200 {}` whether or not the record existed.
async fn delete_todo(State(db): State<Db>, Path(id): Path<i64>) -> Json<serde_json::Value> {
    let removed = db.write().await.remove(&id).is_some();
    debug!(id, removed, "deleted todo");
    Json(serde_json::json!({}))
}
