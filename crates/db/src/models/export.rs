//! Export row shapes.

use chrono::NaiveDate;
use ralph_core::types::{DbId, Priority};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::subtask::Subtask;
use crate::models::todo::Todo;

/// A todo with its subtasks nested, as returned by the JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct TodoWithSubtasks {
    #[serde(flatten)]
    pub todo: Todo,
    pub subtasks: Vec<Subtask>,
}

/// One flattened (todo, subtask) pairing from the CSV export left join.
/// Subtask fields are `None` for todos without subtasks.
#[derive(Debug, Clone, FromRow)]
pub struct CsvExportRow {
    pub todo_id: DbId,
    pub todo_title: String,
    pub todo_completed: bool,
    pub todo_due_date: Option<NaiveDate>,
    pub todo_priority: Priority,
    pub subtask_id: Option<DbId>,
    pub subtask_title: Option<String>,
    pub subtask_completed: Option<bool>,
}
