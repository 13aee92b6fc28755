//! Handlers for the `/tags` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ralph_core::error::CoreError;
use ralph_core::validation;
use ralph_db::models::tag::{CreateTag, Tag, DEFAULT_TAG_COLOR};
use ralph_db::repositories::TagRepo;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::state::AppState;

/// GET /api/tags
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Tag>>> {
    let tags = TagRepo::list_all(&state.pool).await?;
    Ok(Json(tags))
}

/// POST /api/tags
///
/// A duplicate name is a conflict, not a generic failure.
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    let name = validation::validate_tag_name(input.name.as_deref())?;
    let color = input.color.unwrap_or_else(|| DEFAULT_TAG_COLOR.to_string());

    match TagRepo::create(&state.pool, &name, &color).await {
        Ok(tag) => Ok((StatusCode::CREATED, Json(tag))),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
            AppError::Core(CoreError::Conflict("Tag already exists".into())),
        ),
        Err(err) => Err(err.into()),
    }
}
