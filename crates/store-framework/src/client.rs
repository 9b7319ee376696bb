//! # Store Client
//!
//! This module defines the client half of the in-process store.

use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::query::Query;
use crate::row::Row;
use crate::store::RemoteStore;
use crate::subscription::ChangeFeed;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// ## StoreClient
///
/// The `StoreClient` forwards requests over a Tokio mpsc channel to a
/// [`StoreActor`](crate::StoreActor) and awaits the reply on a oneshot channel.
/// It holds only a sender, so it is cheap to clone and can be shared by any
/// number of services and hooks.
#[derive(Clone, Debug)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(crate::message::Response<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::StoreClosed)?;
        response.await.map_err(|_| StoreError::StoreDropped)?
    }

    /// Number of open change feeds on `table`.
    pub async fn listener_count(&self, table: &str) -> Result<usize, StoreError> {
        let table = table.to_string();
        self.request(|respond_to| StoreRequest::ListenerCount { table, respond_to })
            .await
    }

    /// Asks the actor to stop. Open feeds close once the actor exits.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|_| StoreError::StoreClosed)
    }
}

#[async_trait]
impl RemoteStore for StoreClient {
    async fn select(&self, query: Query) -> Result<Vec<Row>, StoreError> {
        self.request(|respond_to| StoreRequest::Select { query, respond_to })
            .await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError> {
        let table = table.to_string();
        self.request(|respond_to| StoreRequest::Insert {
            table,
            row,
            respond_to,
        })
        .await
    }

    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Vec<Row>, StoreError> {
        let (table, id) = (table.to_string(), id.to_string());
        self.request(|respond_to| StoreRequest::Update {
            table,
            id,
            patch,
            respond_to,
        })
        .await
    }

    async fn delete(&self, table: &str, id: &str) -> Result<u64, StoreError> {
        let (table, id) = (table.to_string(), id.to_string());
        self.request(|respond_to| StoreRequest::Delete {
            table,
            id,
            respond_to,
        })
        .await
    }

    async fn subscribe(&self, table: &str) -> Result<ChangeFeed, StoreError> {
        let table = table.to_string();
        self.request(|respond_to| StoreRequest::Subscribe { table, respond_to })
            .await
    }
}
