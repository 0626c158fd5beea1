//! The three remote operations the state manager depends on.
//!
//! # Design
//! `Transport` is the host's half of the host-does-IO split: it executes an
//! `HttpRequest` and hands back the `HttpResponse` as data, reporting only
//! faults below HTTP as errors. `TodoService` glues a transport to the
//! stateless `TodoClient`. The state manager is written against the
//! `TodoApi` trait so it can be driven by a fake in tests.

use async_trait::async_trait;

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{NewTodo, Todo};

/// Owner whose list this client reads and writes.
pub const USER_ID: u64 = 1229;

/// Executes a request built by `TodoClient`.
///
/// Non-2xx responses must be returned as `Ok`; status interpretation belongs
/// to the `parse_*` methods.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Remote todo operations.
#[async_trait]
pub trait TodoApi: Send + Sync {
    /// All items of `user_id`, in server order.
    async fn list(&self, user_id: u64) -> Result<Vec<Todo>, ApiError>;

    /// Persist `input` and return it with its server-assigned id.
    async fn create(&self, input: &NewTodo) -> Result<Todo, ApiError>;

    async fn remove(&self, id: u64) -> Result<(), ApiError>;
}

/// `TodoApi` over HTTP.
#[derive(Debug, Clone)]
pub struct TodoService<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoService<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }
}

#[async_trait]
impl<T: Transport> TodoApi for TodoService<T> {
    async fn list(&self, user_id: u64) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos(user_id);
        let response = self.transport.execute(request).await?;
        self.client.parse_list_todos(response)
    }

    async fn create(&self, input: &NewTodo) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(input)?;
        let response = self.transport.execute(request).await?;
        self.client.parse_create_todo(response)
    }

    async fn remove(&self, id: u64) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        let response = self.transport.execute(request).await?;
        self.client.parse_delete_todo(response)
    }
}
