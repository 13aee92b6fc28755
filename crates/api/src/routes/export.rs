//! Route definitions for the export endpoints.

use axum::routing::get;
use axum::Router;

use crate::handlers::export;
use crate::state::AppState;

/// Routes mounted at `/export`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/json", get(export::export_json))
        .route("/csv", get(export::export_csv))
}
