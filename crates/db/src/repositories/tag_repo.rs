//! Repository for the `tags` and `todo_tags` tables.

use std::collections::HashMap;

use ralph_core::types::DbId;
use sqlx::{FromRow, PgPool};

use crate::models::tag::Tag;

/// Column list for `tags` queries.
const TAG_COLUMNS: &str = "id, name, color";

/// Provides tag CRUD and todo-tag associations.
pub struct TagRepo;

impl TagRepo {
    /// List all tags, name ascending.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags ORDER BY name ASC");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a tag. The name must already be validated and trimmed.
    ///
    /// A duplicate name violates `uq_tags_name`; the caller maps that
    /// database error to a conflict.
    pub async fn create(pool: &PgPool, name: &str, color: &str) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name, color) VALUES ($1, $2) RETURNING {TAG_COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    /// List the tags associated with one todo, name ascending.
    pub async fn for_todo(pool: &PgPool, todo_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.color FROM tags t \
             JOIN todo_tags tt ON t.id = tt.tag_id \
             WHERE tt.todo_id = $1 ORDER BY t.name ASC",
        )
        .bind(todo_id)
        .fetch_all(pool)
        .await
    }

    /// Map each given todo id to its tags (name ascending), one query.
    ///
    /// Todos without tags are absent from the map.
    pub async fn for_todos(
        pool: &PgPool,
        todo_ids: &[DbId],
    ) -> Result<HashMap<DbId, Vec<Tag>>, sqlx::Error> {
        if todo_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TodoTagRow>(
            "SELECT tt.todo_id, t.id, t.name, t.color FROM todo_tags tt \
             JOIN tags t ON t.id = tt.tag_id \
             WHERE tt.todo_id = ANY($1) ORDER BY t.name ASC",
        )
        .bind(todo_ids)
        .fetch_all(pool)
        .await?;

        let mut by_todo: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_todo.entry(row.todo_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
                color: row.color,
            });
        }
        Ok(by_todo)
    }

    /// Associate a tag with a todo. Idempotent: re-applying an existing
    /// association is a no-op.
    pub async fn attach(pool: &PgPool, todo_id: DbId, tag_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO todo_tags (todo_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(todo_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Remove a tag association from a todo.
    ///
    /// Returns `true` if an association was deleted.
    pub async fn detach(pool: &PgPool, todo_id: DbId, tag_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_tags WHERE todo_id = $1 AND tag_id = $2")
            .bind(todo_id)
            .bind(tag_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Join row used by [`TagRepo::for_todos`].
#[derive(FromRow)]
struct TodoTagRow {
    todo_id: DbId,
    id: DbId,
    name: String,
    color: String,
}
