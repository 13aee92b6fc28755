//! Client-side mirror of the server's JSON shapes.
//!
//! Kept independent of the server crates on purpose: the client speaks
//! the wire format, nothing more.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Server-assigned surrogate key.
pub type DbId = i64;

/// Todo priority level, lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A shared label applicable to many todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub color: String,
}

/// A top-level task record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: DbId,
    pub title: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub notes: Option<String>,
    pub position: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A child task record scoped to exactly one todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: DbId,
    pub todo_id: DbId,
    pub title: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// A todo with its subtasks nested, as returned by the JSON export.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportedTodo {
    #[serde(flatten)]
    pub todo: Todo,
    pub subtasks: Vec<Subtask>,
}

/// Payload for creating a todo.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Payload for partially updating a todo; omitted fields keep their value.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTodo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Payload for partially updating a subtask.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateSubtask {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// One positional assignment in a reorder batch.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ReorderEntry {
    pub id: DbId,
    pub position: i32,
}

/// Completion-status filter for the todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Active,
    Completed,
    Overdue,
}

impl StatusFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
            StatusFilter::Overdue => "overdue",
        }
    }
}

/// Sort order for the todo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Newest,
    DueDate,
    Priority,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::DueDate => "due_date",
            SortKey::Priority => "priority",
        }
    }
}

/// Query parameters for listing todos. Absent fields add no parameter.
#[derive(Debug, Clone, Default)]
pub struct TodoQuery {
    pub search: Option<String>,
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
    /// Tag names the todo must all carry; sent comma-separated.
    pub tags: Vec<String>,
    pub sort: Option<SortKey>,
}

impl TodoQuery {
    /// Render as query-string pairs for `reqwest::RequestBuilder::query`.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(priority) = self.priority {
            pairs.push(("priority", priority.as_str().to_string()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tag", self.tags.join(",")));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort", sort.as_str().to_string()));
        }
        pairs
    }
}

/// Derived counts over the current todo list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub active: usize,
    pub overdue: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_yields_no_pairs() {
        assert!(TodoQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn full_query_renders_every_pair() {
        let query = TodoQuery {
            search: Some("milk".into()),
            status: Some(StatusFilter::Active),
            priority: Some(Priority::High),
            tags: vec!["errands".into(), "home".into()],
            sort: Some(SortKey::DueDate),
        };
        assert_eq!(
            query.to_pairs(),
            vec![
                ("search", "milk".to_string()),
                ("status", "active".to_string()),
                ("priority", "high".to_string()),
                ("tag", "errands,home".to_string()),
                ("sort", "due_date".to_string()),
            ]
        );
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = TodoQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(query.to_pairs().is_empty());
    }
}
