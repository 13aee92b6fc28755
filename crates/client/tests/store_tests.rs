//! Store behaviour tests: debounce, undo windows, optimistic reorder,
//! bulk semantics.
//!
//! Uses a fake backend and tokio's paused clock, so the 300 ms / 5 s
//! timers run instantly and deterministically.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ralph_client::api::ApiError;
use ralph_client::backend::TodoBackend;
use ralph_client::store::TodoStore;
use ralph_client::types::{
    CreateTodo, DbId, Priority, ReorderEntry, StatusFilter, Todo, TodoQuery, UpdateTodo,
};

fn make_todo(id: DbId, title: &str) -> Todo {
    Todo {
        id,
        title: title.to_string(),
        completed: false,
        due_date: None,
        priority: Priority::Medium,
        notes: None,
        position: None,
        created_at: "2025-01-01T00:00:00Z".to_string(),
        updated_at: "2025-01-01T00:00:00Z".to_string(),
        tags: Vec::new(),
    }
}

fn api_error(message: &str) -> ApiError {
    ApiError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// In-memory stand-in for the server.
#[derive(Default)]
struct FakeBackend {
    todos: Mutex<Vec<Todo>>,
    list_calls: AtomicUsize,
    last_query: Mutex<Option<TodoQuery>>,
    delete_calls: Mutex<Vec<DbId>>,
    update_calls: Mutex<Vec<DbId>>,
    reorder_calls: Mutex<Vec<Vec<(DbId, i32)>>>,
    fail_reorder: AtomicBool,
    fail_delete: AtomicBool,
    fail_update_ids: Mutex<HashSet<DbId>>,
}

impl FakeBackend {
    fn with_todos(todos: Vec<Todo>) -> Arc<Self> {
        let backend = Arc::new(Self::default());
        *backend.todos.lock().unwrap() = todos;
        backend
    }
}

#[async_trait]
impl TodoBackend for FakeBackend {
    async fn list_todos(&self, query: &TodoQuery) -> Result<Vec<Todo>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        Ok(self.todos.lock().unwrap().clone())
    }

    async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        let mut todos = self.todos.lock().unwrap();
        let id = todos.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let todo = make_todo(id, &input.title);
        todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        if self.fail_update_ids.lock().unwrap().contains(&id) {
            return Err(api_error("update refused"));
        }
        self.update_calls.lock().unwrap().push(id);

        let mut todos = self.todos.lock().unwrap();
        let todo = todos
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| api_error("no such todo"))?;
        if let Some(title) = &changes.title {
            todo.title = title.clone();
        }
        if let Some(completed) = changes.completed {
            todo.completed = completed;
        }
        if let Some(priority) = changes.priority {
            todo.priority = priority;
        }
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: DbId) -> Result<(), ApiError> {
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(api_error("delete refused"));
        }
        self.delete_calls.lock().unwrap().push(id);
        self.todos.lock().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn reorder_todos(&self, orders: &[ReorderEntry]) -> Result<(), ApiError> {
        if self.fail_reorder.load(Ordering::SeqCst) {
            return Err(api_error("reorder refused"));
        }
        self.reorder_calls
            .lock()
            .unwrap()
            .push(orders.iter().map(|o| (o.id, o.position)).collect());
        Ok(())
    }
}

async fn seeded_store(todos: Vec<Todo>) -> (TodoStore<Arc<FakeBackend>>, Arc<FakeBackend>) {
    let backend = FakeBackend::with_todos(todos);
    let store = TodoStore::new(Arc::clone(&backend));
    store.refresh().await;
    (store, backend)
}

// ---------------------------------------------------------------------------
// Debounced refresh
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn rapid_filter_changes_collapse_into_one_fetch() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one")]).await;
    let calls_before = backend.list_calls.load(Ordering::SeqCst);

    store.set_search("g");
    store.set_search("gr");
    store.set_search("gro");

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(
        backend.list_calls.load(Ordering::SeqCst),
        calls_before + 1,
        "only the trailing edge fires"
    );
    let query = backend.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.search.as_deref(), Some("gro"));
}

#[tokio::test(start_paused = true)]
async fn filter_state_composes_the_query() {
    let (store, backend) = seeded_store(vec![]).await;

    store.set_search("milk");
    store.set_status_filter(Some(StatusFilter::Active));
    store.set_priority_filter(Some(Priority::High));
    store.toggle_tag_filter("errands");
    store.toggle_tag_filter("home");
    store.toggle_tag_filter("errands"); // toggled back off

    tokio::time::sleep(Duration::from_millis(400)).await;

    let query = backend.last_query.lock().unwrap().clone().unwrap();
    assert_eq!(query.search.as_deref(), Some("milk"));
    assert_eq!(query.status, Some(StatusFilter::Active));
    assert_eq!(query.priority, Some(Priority::High));
    assert_eq!(query.tags, vec!["home".to_string()]);
}

// ---------------------------------------------------------------------------
// Undo-window deletes
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn delete_hides_immediately_and_fires_after_the_window() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one"), make_todo(2, "two")]).await;

    assert!(store.delete_todo(1));
    assert_eq!(store.todos().len(), 1, "hidden from visible state at once");
    assert!(backend.delete_calls.lock().unwrap().is_empty());
    assert_eq!(store.pending_deletes().len(), 1);

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);
    assert!(store.pending_deletes().is_empty());

    // The window fires exactly once.
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);
}

#[tokio::test(start_paused = true)]
async fn undo_restores_the_item_and_no_delete_is_issued() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one")]).await;

    store.delete_todo(1);
    assert!(store.undo_delete(1));

    tokio::time::sleep(Duration::from_secs(6)).await;

    assert!(backend.delete_calls.lock().unwrap().is_empty());
    assert_eq!(store.todos().len(), 1);
    assert!(store.pending_deletes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dismissal_finalizes_early_exactly_once() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one")]).await;

    store.delete_todo(1);
    store.dismiss_delete(1).await;

    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);

    // The expired window must not fire a second delete.
    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);

    // Undo after dismissal is too late.
    assert!(!store.undo_delete(1));
}

#[tokio::test(start_paused = true)]
async fn multiple_deletions_expire_independently() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one"), make_todo(2, "two")]).await;

    store.delete_todo(1);
    tokio::time::sleep(Duration::from_secs(2)).await;
    store.delete_todo(2);

    // t = 5.5s: the first window (opened at t=0) has expired, the second
    // (opened at t=2) has not.
    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);
    assert_eq!(store.pending_deletes().len(), 1);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1, 2]);
}

#[tokio::test(start_paused = true)]
async fn failed_deferred_delete_restores_the_item() {
    let (store, backend) = seeded_store(vec![make_todo(1, "one")]).await;
    backend.fail_delete.store(true, Ordering::SeqCst);

    store.delete_todo(1);
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(store.todos().len(), 1, "item restored after failure");
    assert!(store.last_error().is_some());
}

#[tokio::test(start_paused = true)]
async fn refresh_keeps_pending_deletes_hidden() {
    let (store, _backend) = seeded_store(vec![make_todo(1, "one"), make_todo(2, "two")]).await;

    store.delete_todo(1);
    // The server still has the row while the window is open.
    store.refresh().await;

    let ids: Vec<DbId> = store.todos().iter().map(|t| t.id).collect();
    assert_eq!(ids, [2]);
}

// ---------------------------------------------------------------------------
// Optimistic reorder
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn reorder_applies_locally_and_persists_positions() {
    let (store, backend) =
        seeded_store(vec![make_todo(1, "a"), make_todo(2, "b"), make_todo(3, "c")]).await;

    store.reorder(&[3, 1, 2]).await.unwrap();

    let ids: Vec<DbId> = store.todos().iter().map(|t| t.id).collect();
    assert_eq!(ids, [3, 1, 2]);

    let recorded = backend.reorder_calls.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0], vec![(3, 0), (1, 1), (2, 2)]);
}

#[tokio::test(start_paused = true)]
async fn failed_reorder_reloads_server_state() {
    let (store, backend) =
        seeded_store(vec![make_todo(1, "a"), make_todo(2, "b"), make_todo(3, "c")]).await;
    backend.fail_reorder.store(true, Ordering::SeqCst);

    let result = store.reorder(&[3, 1, 2]).await;
    assert!(result.is_err());

    // Optimistic order discarded in favor of the server's.
    let ids: Vec<DbId> = store.todos().iter().map(|t| t.id).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert!(store.last_error().is_some());
}

// ---------------------------------------------------------------------------
// Bulk operations
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn bulk_delete_queues_independent_undo_windows() {
    let (store, backend) =
        seeded_store(vec![make_todo(1, "a"), make_todo(2, "b"), make_todo(3, "c")]).await;

    store.toggle_selected(1);
    store.toggle_selected(3);
    assert_eq!(store.bulk_delete_selected(), 2);

    assert_eq!(store.todos().len(), 1);
    assert_eq!(store.pending_deletes().len(), 2);

    // One undo, one expiry.
    store.undo_delete(3);
    tokio::time::sleep(Duration::from_secs(6)).await;

    assert_eq!(*backend.delete_calls.lock().unwrap(), vec![1]);
    assert_eq!(store.todos().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn bulk_set_priority_is_sequential_and_stops_on_failure() {
    let (store, backend) =
        seeded_store(vec![make_todo(1, "a"), make_todo(2, "b"), make_todo(3, "c")]).await;
    backend.fail_update_ids.lock().unwrap().insert(2);

    store.toggle_selected(1);
    store.toggle_selected(2);
    store.toggle_selected(3);

    let result = store.bulk_set_priority(Priority::High).await;
    assert!(result.is_err());

    // Ascending id order: 1 updated, 2 failed, 3 never attempted.
    assert_eq!(*backend.update_calls.lock().unwrap(), vec![1]);
    let todos = store.todos();
    assert_eq!(
        todos.iter().find(|t| t.id == 1).unwrap().priority,
        Priority::High
    );
    assert_eq!(
        todos.iter().find(|t| t.id == 3).unwrap().priority,
        Priority::Medium
    );
    assert!(store.last_error().is_some());
}

#[tokio::test(start_paused = true)]
async fn bulk_set_priority_updates_every_selected_item() {
    let (store, backend) = seeded_store(vec![make_todo(1, "a"), make_todo(2, "b")]).await;

    store.select_all();
    let updated = store.bulk_set_priority(Priority::Low).await.unwrap();

    assert_eq!(updated, 2);
    assert_eq!(*backend.update_calls.lock().unwrap(), vec![1, 2]);
    assert!(store.todos().iter().all(|t| t.priority == Priority::Low));
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn stats_derive_from_the_visible_list() {
    let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    let mut done = make_todo(1, "done");
    done.completed = true;
    let mut late = make_todo(2, "late");
    late.due_date = Some(today - chrono::Duration::days(1));
    late.priority = Priority::High;
    let mut upcoming = make_todo(3, "upcoming");
    upcoming.due_date = Some(today + chrono::Duration::days(1));
    let mut low = make_todo(4, "low");
    low.priority = Priority::Low;

    let (store, _backend) = seeded_store(vec![done, late, upcoming, low]).await;

    let stats = store.stats_at(today);
    assert_eq!(stats.total, 4);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.active, 3);
    assert_eq!(stats.overdue, 1);
    assert_eq!(stats.high, 1);
    assert_eq!(stats.medium, 2);
    assert_eq!(stats.low, 1);
}
