//! # RemoteStore Trait
//!
//! The boundary to the remote relational store. Services only ever talk to an
//! `Arc<dyn RemoteStore>`, so the in-process [`StoreClient`](crate::StoreClient),
//! a mock, or a networked backend can be swapped per test or per deployment.

use crate::error::StoreError;
use crate::query::Query;
use crate::row::Row;
use crate::subscription::ChangeFeed;
use async_trait::async_trait;

/// Query/mutation/subscription capability of a remote table store.
///
/// Stores assign `id`, `created_at` and `updated_at` on insert, refresh
/// `updated_at` on update, and notify every feed of a table after each
/// successful write to it.
#[async_trait]
pub trait RemoteStore: Send + Sync + 'static {
    /// Runs a row query.
    async fn select(&self, query: Query) -> Result<Vec<Row>, StoreError>;

    /// Inserts a row and returns it as stored.
    async fn insert(&self, table: &str, row: Row) -> Result<Row, StoreError>;

    /// Applies a partial patch to the row with `id`. Returns the updated rows
    /// (empty when no row matched).
    async fn update(&self, table: &str, id: &str, patch: Row) -> Result<Vec<Row>, StoreError>;

    /// Deletes the row with `id`. Returns the number of rows removed.
    async fn delete(&self, table: &str, id: &str) -> Result<u64, StoreError>;

    /// Opens a change channel scoped to `table`.
    async fn subscribe(&self, table: &str) -> Result<ChangeFeed, StoreError>;
}
