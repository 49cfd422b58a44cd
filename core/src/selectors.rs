//! Derived views over the todo collection.
//!
//! The functions here are pure and never reorder their input. `SelectorCache`
//! memoizes the filtered/sorted view per `(revision, filter, sort)` so that a
//! host doing identity-based change detection sees the same `Arc` until the
//! state actually changes.

use std::sync::{Arc, Mutex, PoisonError};

use crate::types::{FilterOption, SortOption, Todo};

/// Counters shown next to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
}

impl TodoStats {
    pub fn of(todos: &[Todo]) -> Self {
        Self {
            total: total_count(todos),
            completed: completed_count(todos),
        }
    }

    pub fn active(&self) -> usize {
        self.total - self.completed
    }
}

pub fn filter_todos(todos: &[Todo], filter: FilterOption) -> Vec<Todo> {
    todos.iter().filter(|t| filter.matches(t)).cloned().collect()
}

/// Sort in place; `sort_by` is stable so equal keys keep their order.
pub fn sort_todos(todos: &mut [Todo], sort: SortOption) {
    match sort {
        SortOption::Id => todos.sort_by(|a, b| a.id.cmp(&b.id)),
        SortOption::Recent => todos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
    }
}

pub fn filtered_sorted(todos: &[Todo], filter: FilterOption, sort: SortOption) -> Vec<Todo> {
    let mut visible = filter_todos(todos, filter);
    sort_todos(&mut visible, sort);
    visible
}

pub fn total_count(todos: &[Todo]) -> usize {
    todos.len()
}

pub fn completed_count(todos: &[Todo]) -> usize {
    todos.iter().filter(|t| t.completed).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    filter: FilterOption,
    sort: SortOption,
}

/// Single-entry memo for `filtered_sorted`.
#[derive(Debug, Default)]
pub struct SelectorCache {
    entry: Mutex<Option<(CacheKey, Arc<[Todo]>)>>,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached view for this key, computing it on a miss.
    ///
    /// `revision` must change whenever `todos` changes.
    pub fn get(
        &self,
        revision: u64,
        todos: &[Todo],
        filter: FilterOption,
        sort: SortOption,
    ) -> Arc<[Todo]> {
        let key = CacheKey {
            revision,
            filter,
            sort,
        };
        let mut entry = self.entry.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached, view)) = entry.as_ref() {
            if *cached == key {
                return Arc::clone(view);
            }
        }
        let view: Arc<[Todo]> = filtered_sorted(todos, filter, sort).into();
        *entry = Some((key, Arc::clone(&view)));
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn todo(id: i64, completed: bool, updated: i64) -> Todo {
        Todo {
            id,
            title: format!("todo {id}"),
            completed,
            created_at: at(0),
            updated_at: at(updated),
        }
    }

    fn ids(todos: &[Todo]) -> Vec<i64> {
        todos.iter().map(|t| t.id).collect()
    }

    #[test]
    fn done_filter_sorted_by_id() {
        let todos = vec![todo(2, true, 0), todo(1, true, 0), todo(3, false, 0)];
        let view = filtered_sorted(&todos, FilterOption::Done, SortOption::Id);
        assert_eq!(ids(&view), vec![1, 2]);
    }

    #[test]
    fn active_filter_keeps_incomplete_only() {
        let todos = vec![todo(2, true, 0), todo(1, false, 0), todo(3, false, 0)];
        let view = filtered_sorted(&todos, FilterOption::Active, SortOption::Id);
        assert_eq!(ids(&view), vec![1, 3]);
    }

    #[test]
    fn recent_sort_is_descending_and_stable() {
        let todos = vec![
            todo(1, false, 10),
            todo(2, false, 30),
            todo(3, true, 10),
            todo(4, false, 30),
            todo(5, false, 20),
        ];
        let view = filtered_sorted(&todos, FilterOption::All, SortOption::Recent);
        assert_eq!(ids(&view), vec![2, 4, 5, 1, 3]);
    }

    #[test]
    fn id_sort_does_not_touch_source() {
        let todos = vec![todo(3, false, 0), todo(1, false, 0), todo(2, false, 0)];
        let view = filtered_sorted(&todos, FilterOption::All, SortOption::Id);
        assert_eq!(ids(&view), vec![1, 2, 3]);
        assert_eq!(ids(&todos), vec![3, 1, 2]);
    }

    #[test]
    fn counts_ignore_filter() {
        let todos = vec![todo(1, true, 0), todo(2, false, 0), todo(3, true, 0)];
        let stats = TodoStats::of(&todos);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.active(), 1);
        assert_eq!(TodoStats::of(&[]), TodoStats::default());
    }

    #[test]
    fn cache_returns_same_arc_for_same_key() {
        let cache = SelectorCache::new();
        let todos = vec![todo(2, false, 0), todo(1, false, 0)];
        let first = cache.get(1, &todos, FilterOption::All, SortOption::Id);
        let second = cache.get(1, &todos, FilterOption::All, SortOption::Id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(ids(&first), vec![1, 2]);
    }

    #[test]
    fn cache_recomputes_when_any_key_part_changes() {
        let cache = SelectorCache::new();
        let todos = vec![todo(1, true, 0), todo(2, false, 5)];
        let base = cache.get(1, &todos, FilterOption::All, SortOption::Id);
        let by_filter = cache.get(1, &todos, FilterOption::Done, SortOption::Id);
        assert!(!Arc::ptr_eq(&base, &by_filter));
        assert_eq!(ids(&by_filter), vec![1]);
        let by_sort = cache.get(1, &todos, FilterOption::Done, SortOption::Recent);
        assert!(!Arc::ptr_eq(&by_filter, &by_sort));
        let by_revision = cache.get(2, &todos, FilterOption::Done, SortOption::Recent);
        assert!(!Arc::ptr_eq(&by_sort, &by_revision));
    }
}
