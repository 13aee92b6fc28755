//! Request handlers, one module per resource.

pub mod export;
pub mod subtasks;
pub mod tags;
pub mod todo_tags;
pub mod todos;
