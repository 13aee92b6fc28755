//! Tag models and DTOs.

use ralph_core::types::DbId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Default color assigned to new tags.
pub const DEFAULT_TAG_COLOR: &str = "#6366f1";

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// DTO for associating an existing tag with a todo.
#[derive(Debug, Clone, Deserialize)]
pub struct AddTagToTodo {
    pub tag_id: Option<DbId>,
}
