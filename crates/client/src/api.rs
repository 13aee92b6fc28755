//! REST API client for the ralph server.
//!
//! Wraps the HTTP API (todo CRUD, subtasks, tags, export, reorder) using
//! [`reqwest`]. One method per endpoint; errors carry the server's
//! `{"error": ...}` message when one is present.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::{
    CreateTodo, DbId, ExportedTodo, ReorderEntry, Subtask, Tag, Todo, TodoQuery, UpdateSubtask,
    UpdateTodo,
};

/// HTTP client for a ralph API server.
pub struct TodoApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the API client layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The server's error message, or the raw body if unparseable.
        message: String,
    },
}

/// Body shape of server error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Body shape of the health endpoint.
#[derive(Debug, Deserialize)]
pub struct Health {
    pub status: String,
}

impl TodoApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:3000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    // ---- health ----

    /// GET /health
    pub async fn health(&self) -> Result<Health, ApiError> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    // ---- todos ----

    /// GET /api/todos with the given filters.
    pub async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/todos", self.base_url))
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /api/todos/{id}
    pub async fn get_todo(&self, id: DbId) -> Result<Todo, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/todos/{id}", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /api/todos
    pub async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let response = self
            .client
            .post(format!("{}/api/todos", self.base_url))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// PUT /api/todos/{id}
    pub async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        let response = self
            .client
            .put(format!("{}/api/todos/{id}", self.base_url))
            .json(changes)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// DELETE /api/todos/{id}
    pub async fn delete_todo(&self, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!("{}/api/todos/{id}", self.base_url))
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// PUT /api/todos/reorder
    pub async fn reorder_todos(&self, orders: &[ReorderEntry]) -> Result<(), ApiError> {
        let body = serde_json::json!({ "orders": orders });
        let response = self
            .client
            .put(format!("{}/api/todos/reorder", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- subtasks ----

    /// GET /api/todos/{todo_id}/subtasks
    pub async fn list_subtasks(&self, todo_id: DbId) -> Result<Vec<Subtask>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/todos/{todo_id}/subtasks", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /api/todos/{todo_id}/subtasks
    pub async fn create_subtask(&self, todo_id: DbId, title: &str) -> Result<Subtask, ApiError> {
        let body = serde_json::json!({ "title": title });
        let response = self
            .client
            .post(format!("{}/api/todos/{todo_id}/subtasks", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// PUT /api/todos/{todo_id}/subtasks/{id}
    pub async fn update_subtask(
        &self,
        todo_id: DbId,
        id: DbId,
        changes: &UpdateSubtask,
    ) -> Result<Subtask, ApiError> {
        let response = self
            .client
            .put(format!(
                "{}/api/todos/{todo_id}/subtasks/{id}",
                self.base_url
            ))
            .json(changes)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// DELETE /api/todos/{todo_id}/subtasks/{id}
    pub async fn delete_subtask(&self, todo_id: DbId, id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!(
                "{}/api/todos/{todo_id}/subtasks/{id}",
                self.base_url
            ))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- tags ----

    /// GET /api/tags
    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /api/tags
    pub async fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag, ApiError> {
        let mut body = serde_json::json!({ "name": name });
        if let Some(color) = color {
            body["color"] = serde_json::Value::String(color.to_string());
        }
        let response = self
            .client
            .post(format!("{}/api/tags", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// POST /api/todos/{todo_id}/tags
    ///
    /// Returns the todo's full current tag set.
    pub async fn add_tag_to_todo(&self, todo_id: DbId, tag_id: DbId) -> Result<Vec<Tag>, ApiError> {
        let body = serde_json::json!({ "tag_id": tag_id });
        let response = self
            .client
            .post(format!("{}/api/todos/{todo_id}/tags", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// DELETE /api/todos/{todo_id}/tags/{tag_id}
    pub async fn remove_tag_from_todo(&self, todo_id: DbId, tag_id: DbId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(format!(
                "{}/api/todos/{todo_id}/tags/{tag_id}",
                self.base_url
            ))
            .send()
            .await?;
        Self::check_status(response).await
    }

    // ---- export ----

    /// GET /api/export/json
    pub async fn export_json(&self) -> Result<Vec<ExportedTodo>, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/export/json", self.base_url))
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET /api/export/csv -- returns the raw CSV text.
    pub async fn export_csv(&self) -> Result<String, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/export/csv", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(response.text().await?)
        } else {
            Err(Self::error_from_body(status.as_u16(), response).await)
        }
    }

    // ---- private helpers ----

    /// Deserialize a 2xx response body, or turn the error body into
    /// [`ApiError::Api`].
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            Err(Self::error_from_body(status.as_u16(), response).await)
        }
    }

    /// Discard a 2xx response body (204s), or turn the error body into
    /// [`ApiError::Api`].
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::error_from_body(status.as_u16(), response).await)
        }
    }

    async fn error_from_body(status: u16, response: reqwest::Response) -> ApiError {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.error)
            .unwrap_or(body);
        ApiError::Api { status, message }
    }
}
