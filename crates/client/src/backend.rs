//! The seam between the store and the server.
//!
//! [`TodoStore`](crate::store::TodoStore) only ever talks to the server
//! through this trait -- the subset of the API it needs -- so tests can
//! substitute an in-memory fake and drive the timers deterministically.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, TodoApi};
use crate::types::{CreateTodo, DbId, ReorderEntry, Todo, TodoQuery, UpdateTodo};

/// Server operations the store depends on.
#[async_trait]
pub trait TodoBackend: Send + Sync + 'static {
    async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>, ApiError>;
    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError>;
    async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError>;
    async fn delete_todo(&self, id: DbId) -> Result<(), ApiError>;
    async fn reorder_todos(&self, orders: &[ReorderEntry]) -> Result<(), ApiError>;
}

#[async_trait]
impl TodoBackend for TodoApi {
    async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>, ApiError> {
        TodoApi::list_todos(self, query).await
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        TodoApi::create_todo(self, input).await
    }

    async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        TodoApi::update_todo(self, id, changes).await
    }

    async fn delete_todo(&self, id: DbId) -> Result<(), ApiError> {
        TodoApi::delete_todo(self, id).await
    }

    async fn reorder_todos(&self, orders: &[ReorderEntry]) -> Result<(), ApiError> {
        TodoApi::reorder_todos(self, orders).await
    }
}

#[async_trait]
impl<B: TodoBackend + ?Sized> TodoBackend for Arc<B> {
    async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>, ApiError> {
        (**self).list_todos(query).await
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        (**self).create_todo(input).await
    }

    async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        (**self).update_todo(id, changes).await
    }

    async fn delete_todo(&self, id: DbId) -> Result<(), ApiError> {
        (**self).delete_todo(id).await
    }

    async fn reorder_todos(&self, orders: &[ReorderEntry]) -> Result<(), ApiError> {
        (**self).reorder_todos(orders).await
    }
}
