//! Read-only queries backing the export endpoints.

use std::collections::HashMap;

use ralph_core::types::DbId;
use sqlx::PgPool;

use crate::models::export::{CsvExportRow, TodoWithSubtasks};
use crate::models::subtask::Subtask;
use crate::models::todo::Todo;
use crate::repositories::TagRepo;

/// Provides the export join queries.
pub struct ExportRepo;

impl ExportRepo {
    /// Every todo (id ascending) with its subtasks nested (id ascending)
    /// and tags attached. Todos without subtasks carry an empty array.
    pub async fn todos_with_subtasks(pool: &PgPool) -> Result<Vec<TodoWithSubtasks>, sqlx::Error> {
        let mut todos = sqlx::query_as::<_, Todo>(
            "SELECT id, title, completed, due_date, priority, notes, position, \
             created_at, updated_at FROM todos ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await?;

        let ids: Vec<DbId> = todos.iter().map(|t| t.id).collect();
        let mut tags_by_todo = TagRepo::for_todos(pool, &ids).await?;
        for todo in &mut todos {
            todo.tags = tags_by_todo.remove(&todo.id).unwrap_or_default();
        }

        let subtasks = sqlx::query_as::<_, Subtask>(
            "SELECT id, todo_id, title, completed, created_at, updated_at \
             FROM subtasks ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await?;

        let mut by_todo: HashMap<DbId, Vec<Subtask>> = HashMap::new();
        for subtask in subtasks {
            by_todo.entry(subtask.todo_id).or_default().push(subtask);
        }

        Ok(todos
            .into_iter()
            .map(|todo| {
                let subtasks = by_todo.remove(&todo.id).unwrap_or_default();
                TodoWithSubtasks { todo, subtasks }
            })
            .collect())
    }

    /// Flattened (todo, subtask) left-join rows for the CSV export,
    /// ordered by todo id then subtask id. A todo without subtasks yields
    /// one row with null subtask fields.
    pub async fn csv_rows(pool: &PgPool) -> Result<Vec<CsvExportRow>, sqlx::Error> {
        sqlx::query_as::<_, CsvExportRow>(
            "SELECT \
                t.id AS todo_id, \
                t.title AS todo_title, \
                t.completed AS todo_completed, \
                t.due_date AS todo_due_date, \
                t.priority AS todo_priority, \
                s.id AS subtask_id, \
                s.title AS subtask_title, \
                s.completed AS subtask_completed \
             FROM todos t \
             LEFT JOIN subtasks s ON s.todo_id = t.id \
             ORDER BY t.id ASC, s.id ASC",
        )
        .fetch_all(pool)
        .await
    }
}
