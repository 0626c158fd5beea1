//! Client-side state manager for the todo list.
//!
//! # Design
//! `TodoStore` owns the authoritative in-memory list plus the transient view
//! state around it (placeholder row, pending deletions, draft input, error
//! banner) and publishes every change through a `tokio::sync::watch` channel.
//! A view subscribes once and re-renders on each change, so it sees the
//! placeholder and the per-item loaders while calls are outstanding.
//!
//! Operations take `&self` and may overlap. State is only touched through
//! `send_modify`, once before a remote call and once after it settles, so no
//! update ever observes a half-applied change. Only the latest create owns
//! the placeholder and the input lock, and an id has at most one delete in
//! flight.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::service::{TodoApi, USER_ID};
use crate::types::{filter_todos, Filter, NewTodo, Todo};

/// The one error the banner can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyTitle,
    Load,
    Add,
    Delete,
}

impl ErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            ErrorKind::EmptyTitle => "Title should not be empty",
            ErrorKind::Load => "Unable to load todos",
            ErrorKind::Add => "Unable to add a todo",
            ErrorKind::Delete => "Unable to delete a todo",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Failure of a store operation. Displays as the banner text; the API error
/// behind it is kept as the source.
#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Title should not be empty")]
    EmptyTitle,

    #[error("Unable to load todos")]
    Load(#[source] ApiError),

    #[error("Unable to add a todo")]
    Add(#[source] ApiError),

    #[error("Unable to delete a todo")]
    Delete(#[source] ApiError),
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::EmptyTitle => ErrorKind::EmptyTitle,
            TodoError::Load(_) => ErrorKind::Load,
            TodoError::Add(_) => ErrorKind::Add,
            TodoError::Delete(_) => ErrorKind::Delete,
        }
    }
}

/// Everything a view needs to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoState {
    /// Persisted items, in server order.
    pub todos: Vec<Todo>,
    /// Ids with a delete in flight.
    pub deleting: BTreeSet<u64>,
    /// Optimistic row for the create in flight.
    pub temp_todo: Option<Todo>,
    pub filter: Filter,
    pub error: Option<ErrorKind>,
    /// Current contents of the creation input.
    pub draft: String,
    pub input_disabled: bool,
}

impl TodoState {
    /// Items passing the active filter.
    pub fn visible(&self) -> Vec<Todo> {
        filter_todos(&self.todos, self.filter)
    }

    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.completed).count()
    }

    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.completed).count()
    }

    pub fn is_deleting(&self, id: u64) -> bool {
        self.deleting.contains(&id)
    }
}

pub struct TodoStore<A> {
    api: A,
    user_id: u64,
    state: watch::Sender<TodoState>,
    /// Sequence number of the most recently started create.
    latest_create: AtomicU64,
}

impl<A: TodoApi> TodoStore<A> {
    /// A store for the compiled-in owner.
    pub fn new(api: A) -> Self {
        Self::with_user_id(api, USER_ID)
    }

    pub fn with_user_id(api: A, user_id: u64) -> Self {
        let (state, _) = watch::channel(TodoState::default());
        Self {
            api,
            user_id,
            state,
            latest_create: AtomicU64::new(0),
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    /// A receiver that is notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TodoState {
        self.state.borrow().clone()
    }

    pub fn visible_todos(&self) -> Vec<Todo> {
        self.state.borrow().visible()
    }

    /// Fetch the owner's list, replacing whatever is held. Not retried.
    pub async fn load(&self) -> Result<(), TodoError> {
        self.state.send_modify(|s| s.error = None);
        match self.api.list(self.user_id).await {
            Ok(todos) => {
                debug!(count = todos.len(), "loaded todos");
                self.state.send_modify(|s| s.todos = todos);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load todos");
                self.fail(TodoError::Load(err))
            }
        }
    }

    /// A keystroke in the creation input.
    pub fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.state.send_modify(|s| {
            s.draft = text;
            s.error = None;
            s.input_disabled = false;
        });
    }

    /// Create a todo from the draft. The draft is cleared only on success so
    /// a failed submit can be retried as typed.
    pub async fn submit(&self) -> Result<Todo, TodoError> {
        let draft = self.state.borrow().draft.clone();
        let todo = self.create(&draft).await?;
        self.state.send_modify(|s| s.draft.clear());
        Ok(todo)
    }

    /// Create a todo titled `title` (trimmed). A blank title is rejected
    /// without a network call.
    pub async fn create(&self, title: &str) -> Result<Todo, TodoError> {
        let title = title.trim();
        if title.is_empty() {
            return self.fail(TodoError::EmptyTitle);
        }

        let input = NewTodo {
            user_id: self.user_id,
            title: title.to_string(),
            completed: false,
        };
        let mut seq = 0;
        self.state.send_modify(|s| {
            seq = self.latest_create.fetch_add(1, Ordering::SeqCst) + 1;
            s.error = None;
            s.input_disabled = true;
            s.temp_todo = Some(input.placeholder());
        });

        let result = self.api.create(&input).await;

        self.state.send_modify(|s| {
            // A newer create owns the placeholder and the input lock.
            if self.latest_create.load(Ordering::SeqCst) == seq {
                s.temp_todo = None;
                s.input_disabled = false;
            }
            if let Ok(todo) = &result {
                s.todos.push(todo.clone());
            }
        });

        match result {
            Ok(todo) => {
                debug!(id = todo.id, "created todo");
                Ok(todo)
            }
            Err(err) => {
                warn!(error = %err, "failed to create todo");
                self.fail(TodoError::Add(err))
            }
        }
    }

    /// Delete one todo. The item stays in the list if the call fails.
    ///
    /// Returns at once when a delete of `id` is already in flight; that call
    /// settles the item.
    pub async fn delete(&self, id: u64) -> Result<(), TodoError> {
        let mut claimed = false;
        self.state.send_modify(|s| {
            s.error = None;
            claimed = s.deleting.insert(id);
        });
        if !claimed {
            debug!(id, "delete already in flight");
            return Ok(());
        }

        let result = self.api.remove(id).await;

        self.state.send_modify(|s| {
            s.deleting.remove(&id);
            if result.is_ok() {
                s.todos.retain(|t| t.id != id);
            }
        });

        match result {
            Ok(()) => {
                debug!(id, "deleted todo");
                Ok(())
            }
            Err(err) => {
                warn!(id, error = %err, "failed to delete todo");
                self.fail(TodoError::Delete(err))
            }
        }
    }

    /// Delete all of `todos` concurrently and wait for every call to settle.
    ///
    /// Items whose own delete succeeded are removed even when another one
    /// failed; the operation then reports the first failure. Ids with a
    /// delete already in flight are left to that call.
    pub async fn bulk_delete(&self, todos: &[Todo]) -> Result<(), TodoError> {
        if todos.is_empty() {
            return Ok(());
        }

        let mut ids: Vec<u64> = Vec::with_capacity(todos.len());
        self.state.send_modify(|s| {
            s.error = None;
            ids.extend(todos.iter().map(|t| t.id).filter(|&id| s.deleting.insert(id)));
        });
        if ids.is_empty() {
            return Ok(());
        }

        let api = &self.api;
        let results = join_all(ids.iter().map(|&id| async move { (id, api.remove(id).await) })).await;

        let mut removed = BTreeSet::new();
        let mut first_failure = None;
        for (id, result) in results {
            match result {
                Ok(()) => {
                    removed.insert(id);
                }
                Err(err) => {
                    warn!(id, error = %err, "failed to delete todo");
                    first_failure.get_or_insert(err);
                }
            }
        }

        self.state.send_modify(|s| {
            for id in &ids {
                s.deleting.remove(id);
            }
            s.todos.retain(|t| !removed.contains(&t.id));
        });
        debug!(requested = ids.len(), removed = removed.len(), "bulk delete settled");

        match first_failure {
            None => Ok(()),
            Some(err) => self.fail(TodoError::Delete(err)),
        }
    }

    /// Delete every completed todo.
    pub async fn clear_completed(&self) -> Result<(), TodoError> {
        let completed: Vec<Todo> = self
            .state
            .borrow()
            .todos
            .iter()
            .filter(|t| t.completed)
            .cloned()
            .collect();
        self.bulk_delete(&completed).await
    }

    pub fn set_filter(&self, filter: Filter) {
        self.state.send_modify(|s| s.filter = filter);
    }

    /// Close the error banner.
    pub fn dismiss_error(&self) {
        self.state.send_modify(|s| s.error = None);
    }

    fn fail<T>(&self, err: TodoError) -> Result<T, TodoError> {
        let kind = err.kind();
        self.state.send_modify(|s| s.error = Some(kind));
        Err(err)
    }
}
