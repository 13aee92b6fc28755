//! Handlers for the `/todos` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ralph_core::error::CoreError;
use ralph_core::types::{DbId, Priority};
use ralph_core::validation;
use ralph_db::models::todo::{
    CreateTodo, ReorderEntry, StatusFilter, Todo, TodoFilter, TodoSort, UpdateTodo,
};
use ralph_db::repositories::TodoRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// Query parameters accepted by `GET /api/todos`.
///
/// Values arrive as raw strings; unrecognized `status`/`priority`/`sort`
/// values are ignored rather than rejected, so a stale client never gets
/// an error for a filter the server no longer knows.
#[derive(Debug, Default, Deserialize)]
pub struct TodoListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Comma-separated tag names; the todo must carry every one.
    pub tag: Option<String>,
    pub sort: Option<String>,
}

impl TodoListParams {
    fn into_filter(self) -> TodoFilter {
        let tags = self
            .tag
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        TodoFilter {
            search: self.search.filter(|s| !s.is_empty()),
            status: self.status.as_deref().and_then(StatusFilter::parse),
            priority: self.priority.as_deref().and_then(Priority::parse),
            tags,
            sort: self.sort.as_deref().map(TodoSort::parse).unwrap_or_default(),
        }
    }
}

/// Body of `PUT /api/todos/reorder`.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    #[serde(default)]
    pub orders: Vec<ReorderEntry>,
}

/// GET /api/todos
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TodoListParams>,
) -> AppResult<Json<Vec<Todo>>> {
    let todos = TodoRepo::list(&state.pool, &params.into_filter()).await?;
    Ok(Json(todos))
}

/// GET /api/todos/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Todo>> {
    let todo = TodoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;
    Ok(Json(todo))
}

/// POST /api/todos
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTodo>,
) -> AppResult<(StatusCode, Json<Todo>)> {
    let title = validation::validate_title(input.title.as_deref())?;
    let todo = TodoRepo::create(
        &state.pool,
        &title,
        input.due_date,
        input.priority.unwrap_or_default(),
    )
    .await?;

    tracing::debug!(todo_id = todo.id, "Todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// PUT /api/todos/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    AppJson(mut changes): AppJson<UpdateTodo>,
) -> AppResult<Json<Todo>> {
    if let Some(title) = changes.title.as_deref() {
        changes.title = Some(validation::validate_title(Some(title))?);
    }

    let todo = TodoRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Todo", id }))?;
    Ok(Json(todo))
}

/// DELETE /api/todos/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let deleted = TodoRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Todo", id }))
    }
}

/// PUT /api/todos/reorder
///
/// Applies the whole batch in one transaction; a failure anywhere leaves
/// every position untouched.
pub async fn reorder(
    State(state): State<AppState>,
    AppJson(request): AppJson<ReorderRequest>,
) -> AppResult<Json<serde_json::Value>> {
    if request.orders.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "orders must be a non-empty array of {id, position}".into(),
        )));
    }

    TodoRepo::reorder(&state.pool, &request.orders).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
