//! Subtask models and DTOs.

use ralph_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `subtasks` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subtask {
    pub id: DbId,
    pub todo_id: DbId,
    pub title: String,
    pub completed: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a subtask under a todo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubtask {
    pub title: Option<String>,
}

/// DTO for partially updating a subtask.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubtask {
    pub title: Option<String>,
    pub completed: Option<bool>,
}
