//! Handlers for todo-tag associations
//! (`/todos/{todo_id}/tags`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ralph_core::error::CoreError;
use ralph_core::types::DbId;
use ralph_db::models::tag::{AddTagToTodo, Tag};
use ralph_db::repositories::{TagRepo, TodoRepo};

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// POST /api/todos/{todo_id}/tags
///
/// Idempotent: re-adding an existing association succeeds. Responds with
/// the todo's full current tag set.
pub async fn add(
    State(state): State<AppState>,
    Path(todo_id): Path<DbId>,
    AppJson(input): AppJson<AddTagToTodo>,
) -> AppResult<(StatusCode, Json<Vec<Tag>>)> {
    let tag_id = input.tag_id.ok_or(AppError::Core(CoreError::Validation(
        "tag_id is required and must be a number".into(),
    )))?;

    if !TodoRepo::exists(&state.pool, todo_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Todo",
            id: todo_id,
        }));
    }
    if TagRepo::find_by_id(&state.pool, tag_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Tag",
            id: tag_id,
        }));
    }

    TagRepo::attach(&state.pool, todo_id, tag_id).await?;

    let tags = TagRepo::for_todo(&state.pool, todo_id).await?;
    Ok((StatusCode::CREATED, Json(tags)))
}

/// DELETE /api/todos/{todo_id}/tags/{tag_id}
///
/// 404 when the association does not exist (whether or not the todo and
/// tag themselves do).
pub async fn remove(
    State(state): State<AppState>,
    Path((todo_id, tag_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let detached = TagRepo::detach(&state.pool, todo_id, tag_id).await?;
    if detached {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Tag association",
            id: tag_id,
        }))
    }
}
