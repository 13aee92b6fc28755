//! Todo models and DTOs.

use chrono::NaiveDate;
use ralph_core::types::{DbId, Priority, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::models::tag::Tag;

// ---------------------------------------------------------------------------
// Entity struct (database row)
// ---------------------------------------------------------------------------

/// A row from the `todos` table, plus its associated tags.
///
/// `tags` is not a column; repositories populate it after the row fetch.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub position: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[sqlx(skip)]
    pub tags: Vec<Tag>,
}

// ---------------------------------------------------------------------------
// DTOs (request payloads)
// ---------------------------------------------------------------------------

/// DTO for creating a todo.
///
/// `title` stays an `Option` so the handler can reject a missing field with
/// the proper validation message rather than a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodo {
    pub title: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
}

/// DTO for partially updating a todo. Omitted fields retain their value.
///
/// `due_date` distinguishes "absent" (keep) from an explicit `null`
/// (clear the date), hence the double `Option`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodo {
    pub title: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<NaiveDate>>,
    pub priority: Option<Priority>,
}

/// One positional assignment in a reorder batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ReorderEntry {
    pub id: DbId,
    pub position: i32,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// List filters
// ---------------------------------------------------------------------------

/// Completion-status filter for todo listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Completed,
    /// Not completed and due before today.
    Overdue,
}

impl StatusFilter {
    /// Parse a query-parameter value; unrecognized values return `None`
    /// and the filter is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(StatusFilter::Active),
            "completed" => Some(StatusFilter::Completed),
            "overdue" => Some(StatusFilter::Overdue),
            _ => None,
        }
    }
}

/// Sort order for todo listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoSort {
    /// Manual order: `position ASC NULLS LAST`, then newest first.
    #[default]
    Position,
    /// `created_at DESC`.
    Newest,
    /// `due_date ASC NULLS LAST`.
    DueDate,
    /// High, medium, low.
    Priority,
}

impl TodoSort {
    /// Parse a query-parameter value; unrecognized values fall back to
    /// the default order.
    pub fn parse(value: &str) -> Self {
        match value {
            "newest" => TodoSort::Newest,
            "due_date" => TodoSort::DueDate,
            "priority" => TodoSort::Priority,
            _ => TodoSort::Position,
        }
    }
}

/// Conjunctive filter set for `TodoRepo::list`. Every field is optional;
/// an absent field contributes no predicate.
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
    /// Tag names the todo must all carry (AND semantics).
    pub tags: Vec<String>,
    pub sort: TodoSort,
}
