//! # Resource Access Service
//!
//! `ResourceService<T>` translates domain operations on a [`TableRecord`] into
//! [`RemoteStore`] calls. It owns three things:
//!
//! - the table name,
//! - the row ⇄ record mapping (delegated to `T`),
//! - the lifecycle of change subscriptions on that table.
//!
//! Every listing is ordered by `created_at`, newest first.

use crate::error::ResourceError;
use crate::query::Query;
use crate::record::TableRecord;
use crate::row::{row_id, Row, CREATED_AT_COLUMN};
use crate::store::RemoteStore;
use crate::subscription::Subscription;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Generic CRUD + subscription service for one table.
pub struct ResourceService<T: TableRecord> {
    store: Arc<dyn RemoteStore>,
    table: String,
    _record: PhantomData<fn() -> T>,
}

impl<T: TableRecord> Clone for ResourceService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table: self.table.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: TableRecord> ResourceService<T> {
    /// Service over the record's default table.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self::with_table(store, T::TABLE)
    }

    pub fn with_table(store: Arc<dyn RemoteStore>, table: impl Into<String>) -> Self {
        Self {
            store,
            table: table.into(),
            _record: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Inserts a record and returns the id the store assigned.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn create(&self, params: T::Create) -> Result<T::Id, ResourceError> {
        let row = T::insert_row(params).map_err(ResourceError::write)?;
        let stored = self
            .store
            .insert(&self.table, row)
            .await
            .map_err(ResourceError::write)?;
        let id = row_id(&stored)
            .ok_or_else(|| ResourceError::RemoteWrite("store returned a row without id".into()))?;
        info!(%id, "Created");
        Ok(T::Id::from(id.to_string()))
    }

    /// Every record, newest first.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn list(&self) -> Result<Vec<T>, ResourceError> {
        self.fetch(Query::table(&self.table)).await
    }

    /// Records matching `filter`, newest first. The default filter lists everything.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn search(&self, filter: &T::Filter) -> Result<Vec<T>, ResourceError> {
        self.fetch(T::apply_filter(Query::table(&self.table), filter))
            .await
    }

    /// Applies a partial patch. Fails with `NotFound` when no row has `id`.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn update(&self, id: &T::Id, update: T::Update) -> Result<(), ResourceError> {
        let patch = T::patch_row(update).map_err(ResourceError::write)?;
        let updated = self
            .store
            .update(&self.table, &id.to_string(), patch)
            .await
            .map_err(ResourceError::write)?;
        if updated.is_empty() {
            warn!(%id, "Update target not found");
            return Err(ResourceError::NotFound(id.to_string()));
        }
        info!(%id, "Updated");
        Ok(())
    }

    /// Removes a record. Fails with `NotFound` when no row has `id`.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn delete(&self, id: &T::Id) -> Result<(), ResourceError> {
        let removed = self
            .store
            .delete(&self.table, &id.to_string())
            .await
            .map_err(ResourceError::write)?;
        if removed == 0 {
            warn!(%id, "Delete target not found");
            return Err(ResourceError::NotFound(id.to_string()));
        }
        info!(%id, "Deleted");
        Ok(())
    }

    /// Raw rows restricted to `columns`, for aggregations that do not need whole records.
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn select_columns(&self, columns: &[&str]) -> Result<Vec<Row>, ResourceError> {
        self.store
            .select(Query::table(&self.table).select(columns))
            .await
            .map_err(ResourceError::read)
    }

    /// Opens one change channel on the table. On every change the full list is
    /// re-fetched and handed to `on_change`.
    ///
    /// Each call opens an independent channel; the returned [`Subscription`]
    /// closes it when unsubscribed or dropped.
    pub async fn subscribe<F>(&self, on_change: F) -> Result<Subscription, ResourceError>
    where
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        let mut feed = self
            .store
            .subscribe(&self.table)
            .await
            .map_err(ResourceError::read)?;
        info!(table = %self.table, "Subscription opened");

        let service = self.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = feed.next().await {
                debug!(table = %service.table, kind = ?event.kind, "Change received");
                match service.list().await {
                    Ok(records) => on_change(records),
                    Err(e) => warn!(table = %service.table, error = %e, "Snapshot refetch failed"),
                }
            }
            debug!(table = %service.table, "Change feed closed");
        });

        Ok(Subscription::new(self.table.clone(), task))
    }

    async fn fetch(&self, query: Query) -> Result<Vec<T>, ResourceError> {
        let rows = self
            .store
            .select(query.order_desc(CREATED_AT_COLUMN))
            .await
            .map_err(ResourceError::read)?;
        let records = rows
            .into_iter()
            .map(T::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ResourceError::RemoteRead(format!("malformed row: {e}")))?;
        debug!(count = records.len(), "Fetched");
        Ok(records)
    }
}
