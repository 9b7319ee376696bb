//! # TableRecord Trait
//!
//! The `TableRecord` trait is the contract a domain type implements to be
//! served by the generic [`ResourceService`](crate::ResourceService) and kept
//! live by [`ResourceSync`](crate::ResourceSync).
//!
//! # Architecture Note
//! The service and the hook are written *once*. What differs per resource is
//! captured by associated types (`Create`, `Update`, `Filter`) and by the three
//! row mappings, which are the only place wire column names appear. A project
//! payload can never be sent to the supplier table because the compiler keeps
//! each resource's DTOs apart.

use crate::query::Query;
use crate::row::Row;
use std::fmt::{Debug, Display};

/// A domain record persisted as one row of a store table.
pub trait TableRecord: Clone + Debug + Send + Sync + 'static {
    /// Store-assigned identifier. Built from the row's `id` string.
    type Id: Clone + Debug + Display + Eq + From<String> + Send + Sync + 'static;

    /// Fields supplied by the caller on creation.
    type Create: Debug + Send + Sync + 'static;

    /// Partial patch. Absent fields are left untouched by the store.
    type Update: Debug + Send + Sync + 'static;

    /// Search criteria. `Default` must mean "no filter".
    type Filter: Debug + Default + Send + Sync + 'static;

    /// Default table name.
    const TABLE: &'static str;

    /// Maps a wire row to the domain record.
    fn from_row(row: Row) -> Result<Self, serde_json::Error>;

    /// Maps creation fields to the row to insert, applying column defaults.
    fn insert_row(params: Self::Create) -> Result<Row, serde_json::Error>;

    /// Maps a partial update to the patch row.
    fn patch_row(update: Self::Update) -> Result<Row, serde_json::Error>;

    /// Narrows `query` by `filter`.
    fn apply_filter(query: Query, filter: &Self::Filter) -> Query;
}
