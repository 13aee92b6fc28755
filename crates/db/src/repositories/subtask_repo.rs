//! Repository for the `subtasks` table.
//!
//! Every operation is scoped to the owning todo; a subtask id from a
//! different parent behaves exactly like a missing row.

use ralph_core::types::DbId;
use sqlx::PgPool;

use crate::models::subtask::{Subtask, UpdateSubtask};

/// Column list for `subtasks` queries.
const SUBTASK_COLUMNS: &str = "id, todo_id, title, completed, created_at, updated_at";

/// Provides CRUD operations for subtasks, scoped under their todo.
pub struct SubtaskRepo;

impl SubtaskRepo {
    /// List a todo's subtasks, oldest first.
    pub async fn list_for_todo(pool: &PgPool, todo_id: DbId) -> Result<Vec<Subtask>, sqlx::Error> {
        let query = format!(
            "SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE todo_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Subtask>(&query)
            .bind(todo_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a subtask. The title must already be validated and trimmed.
    pub async fn create(pool: &PgPool, todo_id: DbId, title: &str) -> Result<Subtask, sqlx::Error> {
        let query = format!(
            "INSERT INTO subtasks (todo_id, title) VALUES ($1, $2) RETURNING {SUBTASK_COLUMNS}"
        );
        sqlx::query_as::<_, Subtask>(&query)
            .bind(todo_id)
            .bind(title)
            .fetch_one(pool)
            .await
    }

    /// Partially update a subtask scoped to `(id, todo_id)`: read the
    /// existing row, merge the provided fields, write back.
    ///
    /// Returns `None` if the subtask does not exist under that todo.
    pub async fn update(
        pool: &PgPool,
        todo_id: DbId,
        id: DbId,
        changes: &UpdateSubtask,
    ) -> Result<Option<Subtask>, sqlx::Error> {
        let query = format!("SELECT {SUBTASK_COLUMNS} FROM subtasks WHERE id = $1 AND todo_id = $2");
        let Some(existing) = sqlx::query_as::<_, Subtask>(&query)
            .bind(id)
            .bind(todo_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let title = changes.title.clone().unwrap_or(existing.title);
        let completed = changes.completed.unwrap_or(existing.completed);

        let query = format!(
            "UPDATE subtasks SET title = $1, completed = $2, updated_at = NOW() \
             WHERE id = $3 AND todo_id = $4 \
             RETURNING {SUBTASK_COLUMNS}"
        );
        sqlx::query_as::<_, Subtask>(&query)
            .bind(&title)
            .bind(completed)
            .bind(id)
            .bind(todo_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a subtask scoped to `(id, todo_id)`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, todo_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM subtasks WHERE id = $1 AND todo_id = $2")
            .bind(id)
            .bind(todo_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
