//! Handlers for the `/export` endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use ralph_db::models::export::CsvExportRow;
use ralph_db::repositories::ExportRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Fixed CSV column order.
const CSV_HEADER: &str = "todo_id,todo_title,todo_completed,todo_due_date,todo_priority,\
                          subtask_id,subtask_title,subtask_completed";

/// GET /api/export/json
///
/// Every todo with its subtasks nested as an array field.
pub async fn export_json(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let todos = ExportRepo::todos_with_subtasks(&state.pool).await?;
    Ok(Json(todos))
}

/// GET /api/export/csv
///
/// One row per (todo, subtask) left-join pairing; a todo without subtasks
/// emits a single row with blank subtask fields.
pub async fn export_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = ExportRepo::csv_rows(&state.pool).await?;
    let csv = render_csv(&rows);

    axum::response::Response::builder()
        .status(200)
        .header("Content-Type", "text/csv")
        .header(
            "Content-Disposition",
            "attachment; filename=\"todos-export.csv\"",
        )
        .body(axum::body::Body::from(csv))
        .map_err(|err| AppError::InternalError(err.to_string()))
}

/// Render the export rows as CSV text. Title fields are always quoted
/// (with internal quotes doubled); absent subtask fields stay blank.
fn render_csv(rows: &[CsvExportRow]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{}\n",
            row.todo_id,
            csv_quote(&row.todo_title),
            row.todo_completed,
            row.todo_due_date.map_or(String::new(), |d| d.to_string()),
            row.todo_priority,
            row.subtask_id.map_or(String::new(), |id| id.to_string()),
            row.subtask_title.as_deref().map_or(String::new(), csv_quote),
            row.subtask_completed
                .map_or(String::new(), |c| c.to_string()),
        ));
    }

    out
}

/// Double-quote a field, doubling any internal quotes.
fn csv_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
