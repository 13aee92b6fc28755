//! Handlers for the `/todos/{todo_id}/subtasks` resource.
//!
//! All operations are scoped to the parent todo; a subtask id that exists
//! under a different todo is treated as not found.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ralph_core::error::CoreError;
use ralph_core::types::DbId;
use ralph_core::validation;
use ralph_db::models::subtask::{CreateSubtask, Subtask, UpdateSubtask};
use ralph_db::repositories::{SubtaskRepo, TodoRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// 404 unless the parent todo exists.
async fn ensure_parent(state: &AppState, todo_id: DbId) -> AppResult<()> {
    if TodoRepo::exists(&state.pool, todo_id).await? {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Todo",
            id: todo_id,
        }))
    }
}

/// GET /api/todos/{todo_id}/subtasks
pub async fn list(
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
) -> AppResult<Json<Vec<Subtask>>> {
    ensure_parent(&state, todo_id).await?;

    let subtasks = SubtaskRepo::list_for_todo(&state.pool, todo_id).await?;
    Ok(Json(subtasks))
}

/// POST /api/todos/{todo_id}/subtasks
pub async fn create(
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
    AppJson(input): AppJson<CreateSubtask>,
) -> AppResult<(StatusCode, Json<Subtask>)> {
    let title = validation::validate_title(input.title.as_deref())?;
    ensure_parent(&state, todo_id).await?;

    let subtask = SubtaskRepo::create(&state.pool, todo_id, &title).await?;
    Ok((StatusCode::CREATED, Json(subtask)))
}

/// PUT /api/todos/{todo_id}/subtasks/{id}
pub async fn update(
    State(state): State<AppState>,
    Path((todo_id, id)): Path<(DbId, DbId)>,
    AppJson(mut changes): AppJson<UpdateSubtask>,
) -> AppResult<Json<Subtask>> {
    if let Some(title) = changes.title.as_deref() {
        changes.title = Some(validation::validate_title(Some(title))?);
    }

    let subtask = SubtaskRepo::update(&state.pool, todo_id, id, &changes)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Subtask",
            id,
        }))?;
    Ok(Json(subtask))
}

/// DELETE /api/todos/{todo_id}/subtasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path((todo_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let deleted = SubtaskRepo::delete(&state.pool, todo_id, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Subtask",
            id,
        }))
    }
}
