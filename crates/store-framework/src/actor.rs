//! # In-Process Store Actor
//!
//! This module defines the `StoreActor`, an in-memory stand-in for the remote
//! relational store. It implements the "Server" side of the Actor Model: one
//! Tokio task owns every table and processes requests sequentially, so no
//! locks guard the rows.

use crate::client::StoreClient;
use crate::error::StoreError;
use crate::message::StoreRequest;
use crate::query::Query;
use crate::row::{row_id, Row, CREATED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};
use crate::subscription::{ChangeEvent, ChangeFeed, ChangeKind};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

const FEED_CAPACITY: usize = 64;

/// The actor that owns all tables of the in-process store.
///
/// # Behaviour
///
/// * **Insert**: assigns a v4 UUID `id`, `created_at` and `updated_at`, checks
///   table constraints, appends the row and notifies the table's feeds.
/// * **Select**: filters, orders and projects rows per [`Query`]. Rows with
///   equal sort keys come out newest-inserted first.
/// * **Update**: merges a partial patch into the matching row and refreshes
///   `updated_at`. Patches may not touch `id` or `created_at`.
/// * **Delete**: removes the matching row.
/// * **Subscribe**: hands out a receiver on the table's broadcast channel.
///
/// Writes that match no row succeed with an empty result and send no
/// notification.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    tables: HashMap<String, Vec<Row>>,
    feeds: HashMap<String, broadcast::Sender<ChangeEvent>>,
    non_negative: HashMap<String, Vec<String>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl StoreActor {
    /// Creates a new `StoreActor` and its associated `StoreClient`.
    ///
    /// `buffer_size` is the capacity of the request channel; callers wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            tables: HashMap::new(),
            feeds: HashMap::new(),
            non_negative: HashMap::new(),
            last_timestamp: None,
        };
        (actor, StoreClient::new(sender))
    }

    /// Declares numeric columns of `table` that must never be negative.
    pub fn with_non_negative(mut self, table: &str, columns: &[&str]) -> Self {
        self.non_negative
            .entry(table.to_string())
            .or_default()
            .extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Runs the event loop until every client is dropped or `Shutdown` arrives.
    pub async fn run(mut self) {
        info!("Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Select { query, respond_to } => {
                    let rows = self.select(&query);
                    debug!(table = %query.table, rows = rows.len(), "Select");
                    let _ = respond_to.send(Ok(rows));
                }
                StoreRequest::Insert {
                    table,
                    row,
                    respond_to,
                } => {
                    let result = self.insert(&table, row);
                    if let Err(e) = &result {
                        warn!(%table, error = %e, "Insert rejected");
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    table,
                    id,
                    patch,
                    respond_to,
                } => {
                    let result = self.update(&table, &id, patch);
                    match &result {
                        Ok(rows) if rows.is_empty() => debug!(%table, %id, "Update matched nothing"),
                        Ok(_) => info!(%table, %id, "Updated"),
                        Err(e) => warn!(%table, %id, error = %e, "Update rejected"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete {
                    table,
                    id,
                    respond_to,
                } => {
                    let removed = self.delete(&table, &id);
                    debug!(%table, %id, removed, "Delete");
                    let _ = respond_to.send(Ok(removed));
                }
                StoreRequest::Subscribe { table, respond_to } => {
                    let receiver = self.feed(&table).subscribe();
                    info!(%table, listeners = self.listeners(&table), "Subscribed");
                    let _ = respond_to.send(Ok(ChangeFeed::new(table, receiver)));
                }
                StoreRequest::ListenerCount { table, respond_to } => {
                    let _ = respond_to.send(Ok(self.listeners(&table)));
                }
                StoreRequest::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }

        let rows: usize = self.tables.values().map(Vec::len).sum();
        info!(tables = self.tables.len(), rows, "Store stopped");
    }

    fn select(&self, query: &Query) -> Vec<Row> {
        let Some(rows) = self.tables.get(&query.table) else {
            return Vec::new();
        };
        // Newest insert first so ties on the sort key keep recency order.
        let mut matched: Vec<Row> = rows
            .iter()
            .rev()
            .filter(|row| query.matches(row))
            .cloned()
            .collect();
        query.sort(&mut matched);
        matched.into_iter().map(|row| query.project(row)).collect()
    }

    fn insert(&mut self, table: &str, mut row: Row) -> Result<Row, StoreError> {
        if row.contains_key(ID_COLUMN) {
            return Err(StoreError::Invalid("id is assigned by the store".into()));
        }
        self.check_constraints(table, &row)?;

        let now = self.timestamp();
        row.insert(ID_COLUMN.into(), Value::String(uuid::Uuid::new_v4().to_string()));
        row.insert(CREATED_AT_COLUMN.into(), now.clone());
        row.insert(UPDATED_AT_COLUMN.into(), now);

        let rows = self.tables.entry(table.to_string()).or_default();
        rows.push(row.clone());
        info!(%table, id = row_id(&row).unwrap_or_default(), size = rows.len(), "Inserted");
        self.notify(table, ChangeKind::Insert);
        Ok(row)
    }

    fn update(&mut self, table: &str, id: &str, patch: Row) -> Result<Vec<Row>, StoreError> {
        if patch.contains_key(ID_COLUMN) || patch.contains_key(CREATED_AT_COLUMN) {
            return Err(StoreError::Invalid(
                "id and created_at are immutable".into(),
            ));
        }
        let now = self.timestamp();
        let Some(position) = self
            .tables
            .get(table)
            .and_then(|rows| rows.iter().position(|row| row_id(row) == Some(id)))
        else {
            return Ok(Vec::new());
        };

        let mut merged = self.tables[table][position].clone();
        merged.extend(patch);
        self.check_constraints(table, &merged)?;
        merged.insert(UPDATED_AT_COLUMN.into(), now);

        if let Some(rows) = self.tables.get_mut(table) {
            rows[position] = merged.clone();
        }
        self.notify(table, ChangeKind::Update);
        Ok(vec![merged])
    }

    fn delete(&mut self, table: &str, id: &str) -> u64 {
        let Some(rows) = self.tables.get_mut(table) else {
            return 0;
        };
        let before = rows.len();
        rows.retain(|row| row_id(row) != Some(id));
        let removed = (before - rows.len()) as u64;
        if removed > 0 {
            self.notify(table, ChangeKind::Delete);
        }
        removed
    }

    fn check_constraints(&self, table: &str, row: &Row) -> Result<(), StoreError> {
        let Some(columns) = self.non_negative.get(table) else {
            return Ok(());
        };
        for column in columns {
            if let Some(value) = row.get(column).and_then(Value::as_f64) {
                if value < 0.0 {
                    return Err(StoreError::Constraint(format!(
                        "{table}.{column} must be non-negative, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn feed(&mut self, table: &str) -> &broadcast::Sender<ChangeEvent> {
        self.feeds
            .entry(table.to_string())
            .or_insert_with(|| broadcast::channel(FEED_CAPACITY).0)
    }

    fn listeners(&self, table: &str) -> usize {
        self.feeds
            .get(table)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn notify(&mut self, table: &str, kind: ChangeKind) {
        let event = ChangeEvent {
            table: table.to_string(),
            kind,
        };
        // No listeners is not an error.
        let delivered = self.feed(table).send(event).unwrap_or(0);
        debug!(%table, ?kind, delivered, "Change broadcast");
    }

    /// Strictly increasing wall-clock timestamp, so creation order is total.
    fn timestamp(&mut self) -> Value {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + chrono::Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RemoteStore;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn spawn_store() -> StoreClient {
        let (actor, client) = StoreActor::new(16);
        tokio::spawn(actor.with_non_negative("projects", &["total_budget"]).run());
        client
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let store = spawn_store();

        let stored = store
            .insert("projects", row(json!({"name": "Tower A"})))
            .await
            .unwrap();

        assert!(row_id(&stored).is_some());
        assert!(stored.contains_key(CREATED_AT_COLUMN));
        assert_eq!(stored.get(CREATED_AT_COLUMN), stored.get(UPDATED_AT_COLUMN));
    }

    #[tokio::test]
    async fn test_insert_rejects_client_ids_and_negative_budgets() {
        let store = spawn_store();

        let with_id = store
            .insert("projects", row(json!({"id": "mine", "name": "x"})))
            .await;
        assert!(matches!(with_id, Err(StoreError::Invalid(_))));

        let negative = store
            .insert("projects", row(json!({"name": "x", "total_budget": -1.0})))
            .await;
        assert!(matches!(negative, Err(StoreError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_select_orders_newest_first() {
        let store = spawn_store();
        for name in ["first", "second", "third"] {
            store.insert("projects", row(json!({"name": name}))).await.unwrap();
        }

        let rows = store
            .select(Query::table("projects").order_desc(CREATED_AT_COLUMN))
            .await
            .unwrap();
        let names: Vec<_> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_rows() {
        let store = spawn_store();

        let updated = store
            .update("projects", "nope", row(json!({"name": "x"})))
            .await
            .unwrap();
        assert!(updated.is_empty());
        assert_eq!(store.delete("projects", "nope").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_refreshes_timestamp() {
        let store = spawn_store();
        let stored = store
            .insert("projects", row(json!({"name": "Tower A", "status": "planning"})))
            .await
            .unwrap();
        let id = row_id(&stored).unwrap().to_string();

        let updated = store
            .update("projects", &id, row(json!({"status": "active"})))
            .await
            .unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0]["name"], json!("Tower A"));
        assert_eq!(updated[0]["status"], json!("active"));
        assert_ne!(updated[0][UPDATED_AT_COLUMN], stored[UPDATED_AT_COLUMN]);
        assert_eq!(updated[0][CREATED_AT_COLUMN], stored[CREATED_AT_COLUMN]);

        let immutable = store
            .update("projects", &id, row(json!({"id": "other"})))
            .await;
        assert!(matches!(immutable, Err(StoreError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_writes_notify_feeds() {
        let store = spawn_store();
        let mut feed = store.subscribe("projects").await.unwrap();
        assert_eq!(store.listener_count("projects").await.unwrap(), 1);

        let stored = store
            .insert("projects", row(json!({"name": "Tower A"})))
            .await
            .unwrap();
        let id = row_id(&stored).unwrap().to_string();
        store.delete("projects", &id).await.unwrap();

        assert_eq!(feed.next().await.map(|e| e.kind), Some(ChangeKind::Insert));
        assert_eq!(feed.next().await.map(|e| e.kind), Some(ChangeKind::Delete));

        drop(feed);
        assert_eq!(store.listener_count("projects").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_closes_feeds() {
        let (actor, store) = StoreActor::new(4);
        let handle = tokio::spawn(actor.run());
        let mut feed = store.subscribe("projects").await.unwrap();

        store.shutdown().await.unwrap();
        handle.await.unwrap();

        assert!(feed.next().await.is_none());
        assert!(matches!(
            store.select(Query::table("projects")).await,
            Err(StoreError::StoreClosed)
        ));
    }
}
