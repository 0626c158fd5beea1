use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub user_id: Option<u64>,
}

/// In-memory table. Ids are handed out in increasing order, so iterating the
/// map yields insertion order.
#[derive(Debug)]
pub struct Table {
    next_id: u64,
    todos: BTreeMap<u64, Todo>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: BTreeMap::new(),
        }
    }
}

impl Table {
    /// Store a new todo under the next free id and return it.
    pub fn insert(&mut self, user_id: u64, title: impl Into<String>, completed: bool) -> Todo {
        let todo = Todo {
            id: self.next_id,
            user_id,
            title: title.into(),
            completed,
        };
        self.next_id += 1;
        self.todos.insert(todo.id, todo.clone());
        todo
    }
}

pub type Db = Arc<RwLock<Table>>;

/// Environment variable shared with the `todo` client for the log level.
pub const LOG_LEVEL_ENV: &str = "TODOLIST_LOG_LEVEL";

/// Log filter directives: `TODOLIST_LOG_LEVEL` wins over `RUST_LOG`, and
/// `info` applies when neither is set.
pub fn log_directives(level: Option<String>, rust_log: Option<String>) -> String {
    level.or(rust_log).unwrap_or_else(|| "info".to_string())
}

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Build the router over an existing table, letting tests seed data.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", delete(delete_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_todos(State(db): State<Db>, Query(query): Query<ListQuery>) -> Json<Vec<Todo>> {
    let table = db.read().await;
    let todos = table
        .todos
        .values()
        .filter(|todo| query.user_id.is_none_or(|user_id| todo.user_id == user_id))
        .cloned()
        .collect();
    Json(todos)
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> (StatusCode, Json<Todo>) {
    let todo = db
        .write()
        .await
        .insert(input.user_id, input.title, input.completed);
    tracing::debug!(id = todo.id, user_id = todo.user_id, "created todo");
    (StatusCode::CREATED, Json(todo))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> StatusCode {
    let mut table = db.write().await;
    match table.todos.remove(&id) {
        Some(_) => {
            tracing::debug!(id, "deleted todo");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
