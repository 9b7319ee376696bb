//! # ResourceAccess Trait
//!
//! Provides a common interface for resource-specific services, adding default
//! CRUD and subscription methods built on top of a generic [`ResourceService`].
use crate::{ResourceError, ResourceService, Subscription, TableRecord};
use async_trait::async_trait;

/// Trait for resource-specific services to inherit the standard operations.
///
/// Implementors only say where their inner service lives; `list`, `search`,
/// `create`, `update`, `delete` and `subscribe` come for free and extra
/// domain operations (such as an aggregate) sit next to them.
///
/// # Example
///
/// ```rust
/// use store_framework::{ResourceAccess, ResourceService, TableRecord};
/// # use store_framework::{Query, Row};
/// # #[derive(Clone, Debug, serde::Deserialize)]
/// # struct Crew { id: String, name: String }
/// # #[derive(Debug, serde::Serialize)] struct CrewCreate { name: String }
/// # #[derive(Debug, serde::Serialize)] struct CrewUpdate { name: Option<String> }
/// # impl TableRecord for Crew {
/// #     type Id = String; type Create = CrewCreate; type Update = CrewUpdate; type Filter = ();
/// #     const TABLE: &'static str = "crews";
/// #     fn from_row(row: Row) -> Result<Self, serde_json::Error> { store_framework::from_row(row) }
/// #     fn insert_row(p: CrewCreate) -> Result<Row, serde_json::Error> { store_framework::to_row(&p) }
/// #     fn patch_row(u: CrewUpdate) -> Result<Row, serde_json::Error> { store_framework::to_row(&u) }
/// #     fn apply_filter(q: Query, _: &()) -> Query { q }
/// # }
///
/// // 1. Define the service wrapper
/// #[derive(Clone)]
/// struct CrewService {
///     inner: ResourceService<Crew>,
/// }
///
/// // 2. Implement ResourceAccess
/// impl ResourceAccess<Crew> for CrewService {
///     fn inner(&self) -> &ResourceService<Crew> {
///         &self.inner
///     }
/// }
///
/// // 3. Usage
/// async fn usage(crews: CrewService) {
///     // list() and delete() are provided automatically!
///     let _ = crews.list().await;
///     let _ = crews.delete(&"crew-1".to_string()).await;
/// }
/// ```
#[async_trait]
pub trait ResourceAccess<T: TableRecord>: Send + Sync {
    /// Access the inner generic service.
    fn inner(&self) -> &ResourceService<T>;

    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, ResourceError> {
        tracing::debug!("Sending request");
        self.inner().list().await
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, filter: &T::Filter) -> Result<Vec<T>, ResourceError> {
        tracing::debug!("Sending request");
        self.inner().search(filter).await
    }

    #[tracing::instrument(skip(self))]
    async fn create(&self, params: T::Create) -> Result<T::Id, ResourceError> {
        tracing::debug!("Sending request");
        self.inner().create(params).await
    }

    #[tracing::instrument(skip(self))]
    async fn update(&self, id: &T::Id, update: T::Update) -> Result<(), ResourceError> {
        tracing::debug!("Sending request");
        self.inner().update(id, update).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &T::Id) -> Result<(), ResourceError> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await
    }

    /// Opens a live snapshot subscription on the resource's table.
    async fn subscribe<F>(&self, on_change: F) -> Result<Subscription, ResourceError>
    where
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        self.inner().subscribe(on_change).await
    }
}
