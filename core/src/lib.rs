//! API client core and state manager for a single-user todo list.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A host-supplied `Transport`
//! executes the round-trip; `TodoService` glues the two together, and
//! `TodoStore` keeps the list, the optimistic placeholder, the pending
//! deletions and the error banner in sync with the remote store.
//!
//! # Design
//! - `TodoClient` is stateless: it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Types use owned `String` / `Vec` fields to simplify FFI mapping.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - `TodoStore` publishes state through a `watch` channel and never spawns
//!   tasks; bulk deletes are joined in the caller's task.

pub mod client;
pub mod error;
pub mod http;
pub mod service;
pub mod store;
pub mod types;

pub use client::TodoClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{TodoApi, TodoService, Transport, USER_ID};
pub use store::{ErrorKind, TodoError, TodoState, TodoStore};
pub use types::{filter_todos, Filter, NewTodo, Todo, PLACEHOLDER_ID};
