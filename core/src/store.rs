//! State-owning todo store.
//!
//! # Design
//! `TodoStore` owns the single `TodoCollectionState` and a `TodoApi`. Every
//! operation runs in three phases: a short critical section that marks the
//! store as loading (and reads whatever the operation needs), the network
//! round-trip with no lock held, and a second critical section that applies
//! the outcome to the state as it is at completion time.
//!
//! Operations may run concurrently from several threads. There is no
//! queuing: the last operation to complete decides `loading` and `error`,
//! and collection transitions apply in completion order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::client::TodoApi;
use crate::clock::Clock;
use crate::error::TodoError;
use crate::http::Transport;
use crate::selectors::{SelectorCache, TodoStats};
use crate::types::{CreateTodoParams, FilterOption, SortOption, Todo, UpdateTodoParams};

/// Everything a host renders from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoCollectionState {
    /// Insertion/fetch order, not display order.
    pub todos: Vec<Todo>,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: FilterOption,
    pub sort: SortOption,
    /// Bumped on every change to `todos`, `filter` or `sort`.
    pub revision: u64,
}

impl TodoCollectionState {
    pub fn find(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// `1` for an empty collection, otherwise one past the largest id.
    pub fn next_id(&self) -> i64 {
        self.todos.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
    }

    fn replace_all(&mut self, todos: Vec<Todo>) {
        self.todos = todos;
        self.revision += 1;
    }

    fn push(&mut self, todo: Todo) {
        self.todos.push(todo);
        self.revision += 1;
    }

    /// Replace the first entry with the same id. Missing ids are ignored.
    fn replace(&mut self, todo: Todo) {
        if let Some(slot) = self.todos.iter_mut().find(|t| t.id == todo.id) {
            *slot = todo;
            self.revision += 1;
        }
    }

    fn remove(&mut self, id: i64) {
        let before = self.todos.len();
        self.todos.retain(|t| t.id != id);
        if self.todos.len() != before {
            self.revision += 1;
        }
    }
}

/// Owns the todo collection and performs operations against the service.
pub struct TodoStore<T, C> {
    api: TodoApi<T, C>,
    state: Mutex<TodoCollectionState>,
    selectors: SelectorCache,
}

impl<T: Transport, C: Clock> TodoStore<T, C> {
    pub fn new(api: TodoApi<T, C>) -> Self {
        Self::with_options(api, FilterOption::default(), SortOption::default())
    }

    pub fn with_options(api: TodoApi<T, C>, filter: FilterOption, sort: SortOption) -> Self {
        Self {
            api,
            state: Mutex::new(TodoCollectionState {
                filter,
                sort,
                ..TodoCollectionState::default()
            }),
            selectors: SelectorCache::new(),
        }
    }

    pub fn api(&self) -> &TodoApi<T, C> {
        &self.api
    }

    /// Replace the collection with the service's current list.
    pub fn fetch_todos(&self) -> Result<usize, TodoError> {
        self.begin("fetch", |_| ());
        let result = self.api.fetch_all().map_err(TodoError::from);
        self.finish("fetch", result, |state, todos| {
            let count = todos.len();
            info!(count, "replaced todo collection");
            state.replace_all(todos);
            count
        })
    }

    /// Create a todo and append it locally with an id of `max(ids) + 1`.
    ///
    /// Blank titles are rejected before the store is touched.
    pub fn add_todo(&self, params: CreateTodoParams) -> Result<Todo, TodoError> {
        let title = validate_title(&params.title)?;
        let params = CreateTodoParams::new(title);
        let id = self.begin("add", TodoCollectionState::next_id);
        let result = self
            .api
            .create(&params)
            .map(|_| Todo::create(&params, id, self.api.now()))
            .map_err(TodoError::from);
        self.finish("add", result, |state, todo| {
            state.push(todo.clone());
            todo
        })
    }

    /// Flip `completed` on the todo with this id.
    pub fn toggle_todo(&self, id: i64) -> Result<Todo, TodoError> {
        let current = self.begin("toggle", |state| state.find(id).cloned());
        let result = match current {
            None => Err(TodoError::NotFound(id)),
            Some(todo) => {
                let updated = Todo {
                    completed: !todo.completed,
                    ..todo
                }
                .touched(self.api.now());
                self.push_update(updated)
            }
        };
        self.finish("toggle", result, |state, todo| {
            state.replace(todo.clone());
            todo
        })
    }

    /// Replace the provided fields on the todo with this id.
    pub fn update_todo(&self, id: i64, params: UpdateTodoParams) -> Result<Todo, TodoError> {
        let title = params.title.as_deref().map(validate_title).transpose()?;
        let current = self.begin("update", |state| state.find(id).cloned());
        let result = match current {
            None => Err(TodoError::NotFound(id)),
            Some(todo) => {
                let updated = Todo {
                    title: title.unwrap_or_else(|| todo.title.clone()),
                    completed: params.completed.unwrap_or(todo.completed),
                    ..todo
                }
                .touched(self.api.now());
                self.push_update(updated)
            }
        };
        self.finish("update", result, |state, todo| {
            state.replace(todo.clone());
            todo
        })
    }

    /// Delete remotely, then drop the local entry. An absent id is not an error.
    pub fn delete_todo(&self, id: i64) -> Result<(), TodoError> {
        self.begin("delete", |_| ());
        let result = self.api.delete(id).map_err(TodoError::from);
        self.finish("delete", result, |state, ()| state.remove(id))
    }

    pub fn set_filter(&self, filter: FilterOption) {
        let mut state = self.lock();
        if state.filter != filter {
            state.filter = filter;
            state.revision += 1;
        }
    }

    pub fn set_sort(&self, sort: SortOption) {
        let mut state = self.lock();
        if state.sort != sort {
            state.sort = sort;
            state.revision += 1;
        }
    }

    /// Filtered and sorted view; pointer-equal until the state changes.
    pub fn visible_todos(&self) -> Arc<[Todo]> {
        let state = self.lock();
        self.selectors
            .get(state.revision, &state.todos, state.filter, state.sort)
    }

    pub fn stats(&self) -> TodoStats {
        TodoStats::of(&self.lock().todos)
    }

    pub fn snapshot(&self) -> TodoCollectionState {
        self.lock().clone()
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.lock().todos.clone()
    }

    pub fn find(&self, id: i64) -> Option<Todo> {
        self.lock().find(id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn filter(&self) -> FilterOption {
        self.lock().filter
    }

    pub fn sort(&self) -> SortOption {
        self.lock().sort
    }

    fn push_update(&self, updated: Todo) -> Result<Todo, TodoError> {
        self.api.update(&updated)?;
        Ok(updated)
    }

    fn lock(&self) -> MutexGuard<'_, TodoCollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin<R>(&self, op: &'static str, read: impl FnOnce(&TodoCollectionState) -> R) -> R {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
        debug!(op, "operation started");
        read(&state)
    }

    fn finish<R, U>(
        &self,
        op: &'static str,
        result: Result<R, TodoError>,
        apply: impl FnOnce(&mut TodoCollectionState, R) -> U,
    ) -> Result<U, TodoError> {
        let mut state = self.lock();
        state.loading = false;
        match result {
            Ok(value) => {
                let out = apply(&mut state, value);
                debug!(op, revision = state.revision, "operation completed");
                Ok(out)
            }
            Err(e) => {
                let status = match &e {
                    TodoError::Network(api) => api.status(),
                    _ => None,
                };
                warn!(op, ?status, error = %e, "operation failed");
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }
}

fn validate_title(title: &str) -> Result<String, TodoError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TodoError::Validation("Please enter a todo title".to_string()));
    }
    Ok(trimmed.to_string())
}
