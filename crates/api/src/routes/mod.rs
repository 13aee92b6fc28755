pub mod export;
pub mod health;
pub mod tags;
pub mod todos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /todos                         list, create
/// /todos/reorder                 transactional position batch (PUT)
/// /todos/{id}                    get, update, delete
/// /todos/{todo_id}/subtasks      list, create
/// /todos/{todo_id}/subtasks/{id} update, delete
/// /todos/{todo_id}/tags          associate tag (POST)
/// /todos/{todo_id}/tags/{tag_id} remove association (DELETE)
/// /tags                          list, create
/// /export/json                   nested JSON export
/// /export/csv                    flattened CSV download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/todos", todos::router())
        .nest("/tags", tags::router())
        .nest("/export", export::router())
}
