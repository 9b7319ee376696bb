//! # Mock Store & Testing Guide
//!
//! `MockStore` serves the same [`StoreClient`] API as the in-process store but
//! answers from a queue of scripted expectations. Use it to inject failures
//! that are awkward to provoke in a real store (connectivity loss, rejected
//! writes) and to drive services deterministically.
//!
//! ## When to use Mocks vs the Real Store
//!
//! | Feature | MockStore | StoreActor |
//! |---------|-----------|------------|
//! | **State** | None (scripted replies) | Real tables and feeds |
//! | **Error injection** | Easy (`return_err`) | Only constraint violations |
//! | **Use case** | Service/hook error paths, query shape | End-to-end flows, live sync |
//!
//! ## Patterns
//!
//! **Fluent expectations**: queue replies, run the code, then `verify()`:
//!
//! ```rust
//! use store_framework::mock::MockStore;
//! use store_framework::{Query, RemoteStore, StoreError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockStore::new();
//!     mock.expect_select()
//!         .return_err(StoreError::Unavailable("offline".into()));
//!
//!     let store = mock.client();
//!     let result = store.select(Query::table("projects")).await;
//!     assert!(matches!(result, Err(StoreError::Unavailable(_))));
//!     mock.verify();
//! }
//! ```
//!
//! **Request inspection**: [`create_mock_store`] hands back the raw request
//! receiver so a test can assert on the exact [`Query`](crate::Query) or row a
//! service produced before answering it.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::query::Query;
use crate::row::Row;
use crate::subscription::{ChangeEvent, ChangeFeed};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted reply, consumed in FIFO order.
enum Expectation {
    Select(Result<Vec<Row>, StoreError>),
    Insert(Result<Row, StoreError>),
    Update(Result<Vec<Row>, StoreError>),
    Delete(Result<u64, StoreError>),
    Subscribe(Result<ChangeFeed, StoreError>),
}

impl Expectation {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Select(_) => "select",
            Expectation::Insert(_) => "insert",
            Expectation::Update(_) => "update",
            Expectation::Delete(_) => "delete",
            Expectation::Subscribe(_) => "subscribe",
        }
    }
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

/// A mock store with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mut mock = MockStore::new();
/// mock.expect_insert().return_ok(row);
/// mock.expect_select().return_ok(vec![]);
///
/// let service = ResourceService::<Project>::new(Arc::new(mock.client()));
/// // Use service in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockStore {
    client: StoreClient,
    expectations: Expectations,
    _handle: tokio::task::JoinHandle<()>,
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockStore {
    /// Creates a new mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        // Spawn background task to answer requests
        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let request = match request {
                    StoreRequest::ListenerCount { respond_to, .. } => {
                        let _ = respond_to.send(Ok(0));
                        continue;
                    }
                    StoreRequest::Shutdown => break,
                    other => other,
                };
                let expectation = expectations_clone
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .pop_front();

                match (request, expectation) {
                    (StoreRequest::Select { respond_to, .. }, Some(Expectation::Select(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::Insert { respond_to, .. }, Some(Expectation::Insert(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::Update { respond_to, .. }, Some(Expectation::Update(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (StoreRequest::Delete { respond_to, .. }, Some(Expectation::Delete(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        StoreRequest::Subscribe { respond_to, .. },
                        Some(Expectation::Subscribe(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (request, expectation) => {
                        panic!(
                            "Unexpected request {:?}; next expectation was {}",
                            request,
                            expectation.as_ref().map_or("none", Expectation::name)
                        );
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> StoreClient {
        self.client.clone()
    }

    pub fn expect_select(&mut self) -> ExpectationBuilder<Vec<Row>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Select)
    }

    pub fn expect_insert(&mut self) -> ExpectationBuilder<Row> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Insert)
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<Vec<Row>> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Update)
    }

    pub fn expect_delete(&mut self) -> ExpectationBuilder<u64> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Delete)
    }

    /// Expects a `subscribe` and answers it with a fresh channel. The returned
    /// sender lets the test push change events into that feed.
    pub fn expect_subscribe(&mut self, table: &str) -> broadcast::Sender<ChangeEvent> {
        let (sender, receiver) = broadcast::channel(16);
        self.push(Expectation::Subscribe(Ok(ChangeFeed::new(table, receiver))));
        sender
    }

    /// Expects a `subscribe` that fails.
    pub fn expect_subscribe_err(&mut self, error: StoreError) {
        self.push(Expectation::Subscribe(Err(error)));
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn push(&self, expectation: Expectation) {
        self.expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(expectation);
    }
}

/// Builder that queues one reply of type `T`.
pub struct ExpectationBuilder<T> {
    expectations: Expectations,
    wrap: fn(Result<T, StoreError>) -> Expectation,
}

impl<T> ExpectationBuilder<T> {
    fn new(expectations: Expectations, wrap: fn(Result<T, StoreError>) -> Expectation) -> Self {
        Self { expectations, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.queue(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: StoreError) {
        self.queue(Err(error));
    }

    fn queue(self, response: Result<T, StoreError>) {
        self.expectations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back((self.wrap)(response));
    }
}

// =============================================================================
// REQUEST INSPECTION HELPERS
// =============================================================================

/// Creates a store client and the receiver its requests arrive on.
///
/// Nothing answers the requests: the test pulls them off the receiver with the
/// `expect_*` helpers below, asserts on their contents and replies by hand.
pub fn create_mock_store(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Select request
pub async fn expect_select(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Query, oneshot::Sender<Result<Vec<Row>, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Select { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Insert request
pub async fn expect_insert(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Row, oneshot::Sender<Result<Row, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Insert {
            table,
            row,
            respond_to,
        }) => Some((table, row, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, Row, oneshot::Sender<Result<Vec<Row>, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Update {
            id,
            patch,
            respond_to,
            ..
        }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, oneshot::Sender<Result<u64, StoreError>>)> {
    match receiver.recv().await {
        Some(StoreRequest::Delete { id, respond_to, .. }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteStore;
    use crate::subscription::ChangeKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_store_inspection() {
        let (client, mut receiver) = create_mock_store(10);

        let insert_task = tokio::spawn(async move {
            let row = json!({"name": "Tower A"}).as_object().cloned().unwrap();
            client.insert("projects", row).await
        });

        let (table, row, responder) = expect_insert(&mut receiver)
            .await
            .expect("Expected Insert request");
        assert_eq!(table, "projects");
        assert_eq!(row["name"], json!("Tower A"));
        responder
            .send(Ok(json!({"id": "p1"}).as_object().cloned().unwrap()))
            .unwrap();

        let stored = insert_task.await.unwrap().unwrap();
        assert_eq!(stored["id"], json!("p1"));
    }

    #[tokio::test]
    async fn test_mock_store_with_expectations() {
        let mut mock = MockStore::new();
        mock.expect_delete().return_ok(1);
        mock.expect_update().return_ok(Vec::new());
        let events = mock.expect_subscribe("projects");

        let store = mock.client();
        assert_eq!(store.delete("projects", "p1").await, Ok(1));
        assert_eq!(
            store.update("projects", "p1", Row::new()).await,
            Ok(Vec::new())
        );

        let mut feed = store.subscribe("projects").await.unwrap();
        events
            .send(ChangeEvent {
                table: "projects".into(),
                kind: ChangeKind::Update,
            })
            .unwrap();
        assert_eq!(feed.next().await.map(|e| e.kind), Some(ChangeKind::Update));

        mock.verify();
    }
}
