//! Route definitions for todos and their scoped subresources.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{subtasks, todo_tags, todos};
use crate::state::AppState;

/// Routes mounted at `/todos`.
///
/// `/reorder` is declared alongside `/{id}`; the static segment wins, so
/// a reorder request never parses as a todo id.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(todos::list).post(todos::create))
        .route("/reorder", put(todos::reorder))
        .route(
            "/{id}",
            get(todos::get_by_id)
                .put(todos::update)
                .delete(todos::delete),
        )
        .route(
            "/{todo_id}/subtasks",
            get(subtasks::list).post(subtasks::create),
        )
        .route(
            "/{todo_id}/subtasks/{id}",
            put(subtasks::update).delete(subtasks::delete),
        )
        .route("/{todo_id}/tags", post(todo_tags::add))
        .route("/{todo_id}/tags/{tag_id}", delete(todo_tags::remove))
}
