//! Plain-text rendering of the visible list.

use std::fmt::Write;

use tasklist_core::{Todo, TodoStats};

pub fn todo_line(todo: &Todo) -> String {
    let mark = if todo.completed { 'x' } else { ' ' };
    format!("[{mark}] {:>4}  {}", todo.id, todo.title)
}

pub fn counter_line(stats: TodoStats) -> String {
    format!("{} of {} tasks completed", stats.completed, stats.total)
}

pub fn list(todos: &[Todo], stats: TodoStats) -> String {
    let mut out = String::new();
    if todos.is_empty() {
        out.push_str("No todos\n");
    }
    for todo in todos {
        let _ = writeln!(out, "{}", todo_line(todo));
    }
    let _ = writeln!(out, "{}", counter_line(stats));
    out
}
