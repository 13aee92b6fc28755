//! Shared domain types for the ralph task tracker.
//!
//! Everything here is consumed by both the database/API side and the
//! client crate: the error taxonomy, id/timestamp aliases, the priority
//! enum, and the input validation rules.

pub mod error;
pub mod types;
pub mod validation;

pub use error::CoreError;
pub use types::{DbId, Priority, Timestamp};
