//! In-memory store mirroring server state.
//!
//! The store owns the current todo list, the active filter set, the
//! selection used by bulk operations, and the undo-window delete queue.
//! Filter mutations trigger a debounced refetch; deletes are applied to
//! visible state immediately and sent to the server only once their undo
//! window closes.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::ApiError;
use crate::backend::TodoBackend;
use crate::types::{
    CreateTodo, DbId, Priority, ReorderEntry, SortKey, StatusFilter, Todo, TodoQuery, TodoStats,
    UpdateTodo,
};

/// Trailing-edge delay between a filter change and the refetch it causes.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

/// How long a deleted item can be undone before the server delete fires.
pub const UNDO_WINDOW: Duration = Duration::from_secs(5);

/// The active filter/sort/search/tag-selection state.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub search: String,
    pub status: Option<StatusFilter>,
    pub priority: Option<Priority>,
    pub tags: Vec<String>,
    pub sort: Option<SortKey>,
}

impl FilterState {
    /// Compose the query parameters for the current filters.
    pub fn to_query(&self) -> TodoQuery {
        TodoQuery {
            search: (!self.search.is_empty()).then(|| self.search.clone()),
            status: self.status,
            priority: self.priority,
            tags: self.tags.clone(),
            sort: self.sort,
        }
    }
}

/// A queued deletion notice: the removed item plus the handle that
/// cancels its undo window.
struct PendingDelete {
    todo: Todo,
    window: CancellationToken,
}

#[derive(Default)]
struct StoreState {
    todos: Vec<Todo>,
    filters: FilterState,
    selection: HashSet<DbId>,
    last_error: Option<String>,
    /// Sequence number of the newest refresh whose result was applied.
    applied_refresh: u64,
}

struct Inner<B> {
    backend: B,
    state: Mutex<StoreState>,
    pending_deletes: Mutex<HashMap<DbId, PendingDelete>>,
    debounce: Mutex<Option<CancellationToken>>,
    refresh_seq: AtomicU64,
}

/// The client-side view of the todo list.
///
/// Cheaply cloneable; the debounce and undo timers run as spawned tasks
/// holding their own clone.
pub struct TodoStore<B: TodoBackend> {
    inner: Arc<Inner<B>>,
}

impl<B: TodoBackend> Clone for TodoStore<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: TodoBackend> TodoStore<B> {
    pub fn new(backend: B) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                state: Mutex::new(StoreState::default()),
                pending_deletes: Mutex::new(HashMap::new()),
                debounce: Mutex::new(None),
                refresh_seq: AtomicU64::new(0),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Snapshots
    // -----------------------------------------------------------------------

    /// The currently visible todo list.
    pub fn todos(&self) -> Vec<Todo> {
        self.inner.state.lock().unwrap().todos.clone()
    }

    pub fn filters(&self) -> FilterState {
        self.inner.state.lock().unwrap().filters.clone()
    }

    /// Items queued for deletion whose undo window is still open.
    pub fn pending_deletes(&self) -> Vec<Todo> {
        self.inner
            .pending_deletes
            .lock()
            .unwrap()
            .values()
            .map(|entry| entry.todo.clone())
            .collect()
    }

    /// The most recent request failure, cleared by the next successful
    /// refresh.
    pub fn last_error(&self) -> Option<String> {
        self.inner.state.lock().unwrap().last_error.clone()
    }

    /// Derived counts over the currently visible list.
    pub fn stats(&self) -> TodoStats {
        self.stats_at(chrono::Utc::now().date_naive())
    }

    /// [`Self::stats`] with an explicit "today" so tests stay
    /// deterministic.
    pub fn stats_at(&self, today: chrono::NaiveDate) -> TodoStats {
        let state = self.inner.state.lock().unwrap();
        let mut stats = TodoStats {
            total: state.todos.len(),
            ..TodoStats::default()
        };
        for todo in &state.todos {
            if todo.completed {
                stats.completed += 1;
            } else {
                stats.active += 1;
                if todo.due_date.is_some_and(|due| due < today) {
                    stats.overdue += 1;
                }
            }
            match todo.priority {
                Priority::High => stats.high += 1,
                Priority::Medium => stats.medium += 1,
                Priority::Low => stats.low += 1,
            }
        }
        stats
    }

    // -----------------------------------------------------------------------
    // Selection (bulk operations)
    // -----------------------------------------------------------------------

    pub fn toggle_selected(&self, id: DbId) {
        let mut state = self.inner.state.lock().unwrap();
        if !state.selection.remove(&id) {
            state.selection.insert(id);
        }
    }

    pub fn select_all(&self) {
        let mut state = self.inner.state.lock().unwrap();
        let ids: Vec<DbId> = state.todos.iter().map(|t| t.id).collect();
        state.selection.extend(ids);
    }

    pub fn clear_selection(&self) {
        self.inner.state.lock().unwrap().selection.clear();
    }

    /// Selected ids, ascending (bulk operations run in this order).
    pub fn selected_ids(&self) -> Vec<DbId> {
        let mut ids: Vec<DbId> = self
            .inner
            .state
            .lock()
            .unwrap()
            .selection
            .iter()
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    // -----------------------------------------------------------------------
    // Filters -> debounced refresh
    // -----------------------------------------------------------------------

    pub fn set_search(&self, search: impl Into<String>) {
        self.inner.state.lock().unwrap().filters.search = search.into();
        self.schedule_refresh();
    }

    pub fn set_status_filter(&self, status: Option<StatusFilter>) {
        self.inner.state.lock().unwrap().filters.status = status;
        self.schedule_refresh();
    }

    pub fn set_priority_filter(&self, priority: Option<Priority>) {
        self.inner.state.lock().unwrap().filters.priority = priority;
        self.schedule_refresh();
    }

    pub fn set_sort(&self, sort: Option<SortKey>) {
        self.inner.state.lock().unwrap().filters.sort = sort;
        self.schedule_refresh();
    }

    /// Add the tag to the filter set if absent, remove it otherwise.
    pub fn toggle_tag_filter(&self, name: &str) {
        {
            let mut state = self.inner.state.lock().unwrap();
            let tags = &mut state.filters.tags;
            if let Some(index) = tags.iter().position(|t| t == name) {
                tags.remove(index);
            } else {
                tags.push(name.to_string());
            }
        }
        self.schedule_refresh();
    }

    /// Cancel any pending refresh timer and start a new one.
    /// Trailing-edge only: rapid changes collapse into one fetch.
    fn schedule_refresh(&self) {
        let token = CancellationToken::new();
        {
            let mut debounce = self.inner.debounce.lock().unwrap();
            if let Some(previous) = debounce.take() {
                previous.cancel();
            }
            *debounce = Some(token.clone());
        }

        let store = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(DEBOUNCE_DELAY) => {
                    store.refresh().await;
                }
            }
        });
    }

    /// Fetch the list for the current filters and apply it.
    ///
    /// Responses apply newest-wins: a slow fetch that resolves after a
    /// later one is dropped. Items inside an open undo window stay
    /// hidden even though the server still has them.
    pub async fn refresh(&self) {
        let seq = self.inner.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let query = self.inner.state.lock().unwrap().filters.to_query();

        match self.inner.backend.list_todos(&query).await {
            Ok(todos) => {
                let hidden: HashSet<DbId> = self
                    .inner
                    .pending_deletes
                    .lock()
                    .unwrap()
                    .keys()
                    .copied()
                    .collect();
                let mut state = self.inner.state.lock().unwrap();
                if seq > state.applied_refresh {
                    state.applied_refresh = seq;
                    state.todos = todos
                        .into_iter()
                        .filter(|todo| !hidden.contains(&todo.id))
                        .collect();
                    state.last_error = None;
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "List refresh failed");
                self.inner.state.lock().unwrap().last_error = Some(err.to_string());
            }
        }
    }

    // -----------------------------------------------------------------------
    // Creation and edits
    // -----------------------------------------------------------------------

    pub async fn create_todo(&self, input: &CreateTodo) -> Result<Todo, ApiError> {
        match self.inner.backend.create_todo(input).await {
            Ok(todo) => {
                self.inner.state.lock().unwrap().todos.insert(0, todo.clone());
                Ok(todo)
            }
            Err(err) => {
                self.inner.state.lock().unwrap().last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn update_todo(&self, id: DbId, changes: &UpdateTodo) -> Result<Todo, ApiError> {
        match self.inner.backend.update_todo(id, changes).await {
            Ok(todo) => {
                self.replace_todo(todo.clone());
                Ok(todo)
            }
            Err(err) => {
                self.inner.state.lock().unwrap().last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Flip an item's completion state.
    pub async fn toggle_completed(&self, id: DbId) -> Result<(), ApiError> {
        let completed = {
            let state = self.inner.state.lock().unwrap();
            state.todos.iter().find(|t| t.id == id).map(|t| t.completed)
        };
        let Some(completed) = completed else {
            return Ok(());
        };

        let changes = UpdateTodo {
            completed: Some(!completed),
            ..UpdateTodo::default()
        };
        self.update_todo(id, &changes).await.map(|_| ())
    }

    fn replace_todo(&self, todo: Todo) {
        let mut state = self.inner.state.lock().unwrap();
        if let Some(existing) = state.todos.iter_mut().find(|t| t.id == todo.id) {
            *existing = todo;
        }
    }

    // -----------------------------------------------------------------------
    // Undo-window deletes
    // -----------------------------------------------------------------------

    /// Remove the item from visible state and queue its deletion.
    ///
    /// The server delete fires when the undo window elapses or the
    /// notice is dismissed, whichever comes first -- exactly once.
    /// Returns `false` if the id is not in the visible list.
    pub fn delete_todo(&self, id: DbId) -> bool {
        let todo = {
            let mut state = self.inner.state.lock().unwrap();
            let Some(index) = state.todos.iter().position(|t| t.id == id) else {
                return false;
            };
            state.selection.remove(&id);
            state.todos.remove(index)
        };

        let window = CancellationToken::new();
        self.inner.pending_deletes.lock().unwrap().insert(
            id,
            PendingDelete {
                todo,
                window: window.clone(),
            },
        );

        let store = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = window.cancelled() => {}
                _ = tokio::time::sleep(UNDO_WINDOW) => {
                    store.finalize_delete(id).await;
                }
            }
        });

        true
    }

    /// Cancel a queued deletion and restore the item.
    ///
    /// The restored item is appended; the next refresh re-establishes
    /// server ordering. Returns `false` if the window already closed.
    pub fn undo_delete(&self, id: DbId) -> bool {
        let Some(entry) = self.inner.pending_deletes.lock().unwrap().remove(&id) else {
            return false;
        };
        entry.window.cancel();
        self.inner.state.lock().unwrap().todos.push(entry.todo);
        true
    }

    /// Dismiss a deletion notice, finalizing the delete immediately.
    pub async fn dismiss_delete(&self, id: DbId) {
        self.finalize_delete(id).await;
    }

    /// Issue the deferred server delete for a queued deletion.
    ///
    /// Both the window timer and dismissal land here; whichever removes
    /// the queue entry first performs the call, the other is a no-op.
    async fn finalize_delete(&self, id: DbId) {
        let entry = self.inner.pending_deletes.lock().unwrap().remove(&id);
        let Some(entry) = entry else {
            return;
        };
        entry.window.cancel();

        if let Err(err) = self.inner.backend.delete_todo(id).await {
            tracing::warn!(todo_id = id, error = %err, "Deferred delete failed, restoring item");
            let mut state = self.inner.state.lock().unwrap();
            state.todos.push(entry.todo);
            state.last_error = Some(err.to_string());
        }
    }

    // -----------------------------------------------------------------------
    // Optimistic reorder
    // -----------------------------------------------------------------------

    /// Apply a drag-drop order locally, then persist it.
    ///
    /// `ordered_ids` is the new visible order; positions are the array
    /// indexes. On failure the list is reloaded from the server,
    /// discarding the optimistic arrangement.
    pub async fn reorder(&self, ordered_ids: &[DbId]) -> Result<(), ApiError> {
        let orders: Vec<ReorderEntry> = ordered_ids
            .iter()
            .enumerate()
            .map(|(index, id)| ReorderEntry {
                id: *id,
                position: index as i32,
            })
            .collect();

        {
            let mut state = self.inner.state.lock().unwrap();
            let previous = std::mem::take(&mut state.todos);
            let mut named: HashMap<DbId, Todo> = HashMap::new();
            let mut unnamed = Vec::new();
            for todo in previous {
                if ordered_ids.contains(&todo.id) {
                    named.insert(todo.id, todo);
                } else {
                    unnamed.push(todo);
                }
            }

            let mut reordered = Vec::with_capacity(named.len() + unnamed.len());
            for entry in &orders {
                if let Some(mut todo) = named.remove(&entry.id) {
                    todo.position = Some(entry.position);
                    reordered.push(todo);
                }
            }
            reordered.extend(unnamed);
            state.todos = reordered;
        }

        match self.inner.backend.reorder_todos(&orders).await {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(error = %err, "Reorder failed, reloading from server");
                self.inner.state.lock().unwrap().last_error = Some(err.to_string());
                self.refresh().await;
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------------

    /// Queue an undoable deletion for every selected item.
    ///
    /// Each deletion gets its own independent undo window.
    pub fn bulk_delete_selected(&self) -> usize {
        let ids = self.selected_ids();
        let mut queued = 0;
        for id in ids {
            if self.delete_todo(id) {
                queued += 1;
            }
        }
        queued
    }

    /// Set the priority of every selected item, one update call per id,
    /// sequentially.
    ///
    /// Not atomic: a mid-batch failure stops the loop and leaves the
    /// already-updated items updated.
    pub async fn bulk_set_priority(&self, priority: Priority) -> Result<usize, ApiError> {
        let ids = self.selected_ids();
        let mut updated = 0;
        for id in ids {
            let changes = UpdateTodo {
                priority: Some(priority),
                ..UpdateTodo::default()
            };
            match self.inner.backend.update_todo(id, &changes).await {
                Ok(todo) => {
                    self.replace_todo(todo);
                    updated += 1;
                }
                Err(err) => {
                    self.inner.state.lock().unwrap().last_error = Some(err.to_string());
                    return Err(err);
                }
            }
        }
        Ok(updated)
    }
}
