//! Client data layer for the ralph task tracker.
//!
//! Provides a typed HTTP client ([`api::TodoApi`]) with one method per
//! server endpoint, and an in-memory store ([`store::TodoStore`]) that
//! mirrors server state and implements the optimistic-UI contract:
//! debounced refetch on filter changes, undo-window soft deletes,
//! optimistic reorder with reload-on-failure, and bulk operations.
//!
//! The store talks to the server through the [`backend::TodoBackend`]
//! trait so tests can substitute an in-memory fake.

pub mod api;
pub mod backend;
pub mod store;
pub mod types;

pub use api::{ApiError, TodoApi};
pub use store::TodoStore;
