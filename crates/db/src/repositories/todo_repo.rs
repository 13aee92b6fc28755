//! Repository for the `todos` table.
//!
//! Listing supports the conjunctive filter set from [`TodoFilter`]; the
//! WHERE/ORDER fragments are assembled with [`sqlx::QueryBuilder`] so each
//! predicate is an explicit, parameterized push rather than ad hoc string
//! concatenation.

use chrono::NaiveDate;
use ralph_core::types::{DbId, Priority};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::todo::{ReorderEntry, StatusFilter, Todo, TodoFilter, TodoSort, UpdateTodo};
use crate::repositories::TagRepo;

/// Column list for `todos` queries.
const TODO_COLUMNS: &str =
    "id, title, completed, due_date, priority, notes, position, created_at, updated_at";

/// Provides CRUD, filtered listing, and the reorder transaction.
pub struct TodoRepo;

impl TodoRepo {
    /// List todos matching `filter`, with tags attached.
    ///
    /// Absent filter fields contribute no predicate; an empty result is an
    /// empty vector, never an error.
    pub async fn list(pool: &PgPool, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {TODO_COLUMNS} FROM todos"));
        let mut has_where = false;

        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            push_predicate(&mut qb, &mut has_where);
            qb.push("title ILIKE ");
            qb.push_bind(format!("%{search}%"));
        }

        match filter.status {
            Some(StatusFilter::Active) => {
                push_predicate(&mut qb, &mut has_where);
                qb.push("completed = FALSE");
            }
            Some(StatusFilter::Completed) => {
                push_predicate(&mut qb, &mut has_where);
                qb.push("completed = TRUE");
            }
            Some(StatusFilter::Overdue) => {
                push_predicate(&mut qb, &mut has_where);
                qb.push("completed = FALSE AND due_date < CURRENT_DATE");
            }
            None => {}
        }

        if let Some(priority) = filter.priority {
            push_predicate(&mut qb, &mut has_where);
            qb.push("priority = ");
            qb.push_bind(priority);
        }

        if !filter.tags.is_empty() {
            // AND semantics: the todo must carry every listed tag.
            push_predicate(&mut qb, &mut has_where);
            qb.push(
                "id IN (SELECT tt.todo_id FROM todo_tags tt \
                 JOIN tags t ON t.id = tt.tag_id \
                 WHERE t.name IN (",
            );
            let mut names = qb.separated(", ");
            for name in &filter.tags {
                names.push_bind(name);
            }
            qb.push(") GROUP BY tt.todo_id HAVING COUNT(DISTINCT t.name) = ");
            qb.push_bind(filter.tags.len() as i64);
            qb.push(")");
        }

        qb.push(match filter.sort {
            TodoSort::Position => " ORDER BY position ASC NULLS LAST, created_at DESC",
            TodoSort::Newest => " ORDER BY created_at DESC",
            TodoSort::DueDate => " ORDER BY due_date ASC NULLS LAST",
            TodoSort::Priority => {
                " ORDER BY CASE priority \
                 WHEN 'high' THEN 1 WHEN 'medium' THEN 2 WHEN 'low' THEN 3 \
                 ELSE 4 END"
            }
        });

        let mut todos = qb.build_query_as::<Todo>().fetch_all(pool).await?;
        Self::attach_tags(pool, &mut todos).await?;
        Ok(todos)
    }

    /// Find a todo by its ID, with tags attached.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1");
        let todo = sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match todo {
            Some(mut todo) => {
                Self::attach_tags(pool, std::slice::from_mut(&mut todo)).await?;
                Ok(Some(todo))
            }
            None => Ok(None),
        }
    }

    /// Check whether a todo exists (parent checks for scoped resources).
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM todos WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    /// Insert a todo. The title must already be validated and trimmed.
    pub async fn create(
        pool: &PgPool,
        title: &str,
        due_date: Option<NaiveDate>,
        priority: Priority,
    ) -> Result<Todo, sqlx::Error> {
        let query = format!(
            "INSERT INTO todos (title, due_date, priority) VALUES ($1, $2, $3) \
             RETURNING {TODO_COLUMNS}"
        );
        sqlx::query_as::<_, Todo>(&query)
            .bind(title)
            .bind(due_date)
            .bind(priority)
            .fetch_one(pool)
            .await
    }

    /// Partially update a todo: read the existing row, merge the provided
    /// fields over it, write the result back.
    ///
    /// Returns `None` if no todo with the given ID exists. A provided title
    /// must already be validated and trimmed.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &UpdateTodo,
    ) -> Result<Option<Todo>, sqlx::Error> {
        let query = format!("SELECT {TODO_COLUMNS} FROM todos WHERE id = $1");
        let Some(existing) = sqlx::query_as::<_, Todo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let title = changes.title.clone().unwrap_or(existing.title);
        let completed = changes.completed.unwrap_or(existing.completed);
        let due_date = match changes.due_date {
            Some(explicit) => explicit,
            None => existing.due_date,
        };
        let priority = changes.priority.unwrap_or(existing.priority);

        let query = format!(
            "UPDATE todos SET title = $1, completed = $2, due_date = $3, priority = $4, \
             updated_at = NOW() WHERE id = $5 \
             RETURNING {TODO_COLUMNS}"
        );
        let mut todo = sqlx::query_as::<_, Todo>(&query)
            .bind(&title)
            .bind(completed)
            .bind(due_date)
            .bind(priority)
            .bind(id)
            .fetch_one(pool)
            .await?;

        Self::attach_tags(pool, std::slice::from_mut(&mut todo)).await?;
        Ok(Some(todo))
    }

    /// Delete a todo by ID. Cascade deletes its subtasks and tag links.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of positional updates in a single transaction.
    ///
    /// Either every entry is applied or none: any failure rolls the whole
    /// batch back (the transaction guard rolls back on drop).
    pub async fn reorder(pool: &PgPool, orders: &[ReorderEntry]) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for entry in orders {
            sqlx::query("UPDATE todos SET position = $1, updated_at = NOW() WHERE id = $2")
                .bind(entry.position)
                .bind(entry.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = orders.len(), "Applied reorder batch");
        Ok(())
    }

    /// Populate `tags` on each todo with one grouped query.
    async fn attach_tags(pool: &PgPool, todos: &mut [Todo]) -> Result<(), sqlx::Error> {
        let ids: Vec<DbId> = todos.iter().map(|t| t.id).collect();
        let mut by_todo = TagRepo::for_todos(pool, &ids).await?;
        for todo in todos {
            todo.tags = by_todo.remove(&todo.id).unwrap_or_default();
        }
        Ok(())
    }
}

/// Push `" WHERE "` for the first predicate and `" AND "` thereafter.
fn push_predicate(qb: &mut QueryBuilder<'_, Postgres>, has_where: &mut bool) {
    if *has_where {
        qb.push(" AND ");
    } else {
        qb.push(" WHERE ");
        *has_where = true;
    }
}
