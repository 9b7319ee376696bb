//! # Store Messages
//!
//! This module defines the request type exchanged between a [`StoreClient`](crate::StoreClient)
//! and the [`StoreActor`](crate::StoreActor) that owns the tables.

use crate::error::StoreError;
use crate::query::Query;
use crate::row::Row;
use crate::subscription::ChangeFeed;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the store actor.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// Internal message type sent to the store actor.
///
/// The variants mirror the capabilities a remote relational store exposes:
/// row queries, the three write verbs, and a table-scoped change channel.
/// `ListenerCount` and `Shutdown` are housekeeping for tests and orderly teardown.
#[derive(Debug)]
pub enum StoreRequest {
    Select {
        query: Query,
        respond_to: Response<Vec<Row>>,
    },
    Insert {
        table: String,
        row: Row,
        respond_to: Response<Row>,
    },
    Update {
        table: String,
        id: String,
        patch: Row,
        respond_to: Response<Vec<Row>>,
    },
    Delete {
        table: String,
        id: String,
        respond_to: Response<u64>,
    },
    Subscribe {
        table: String,
        respond_to: Response<ChangeFeed>,
    },
    ListenerCount {
        table: String,
        respond_to: Response<usize>,
    },
    Shutdown,
}
