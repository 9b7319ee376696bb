//! # Framework Errors
//!
//! Two layers of errors live here:
//!
//! - [`StoreError`] is what the remote store boundary reports (channel failures,
//!   constraint violations, malformed requests, connectivity).
//! - [`ResourceError`] is what services and sync hooks report to their callers.
//!   It deliberately collapses store failures into read/write categories so UI
//!   code only has to distinguish "loading failed" from "saving failed".

/// Errors reported by a [`RemoteStore`](crate::RemoteStore) implementation.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum StoreError {
    #[error("Store closed")]
    StoreClosed,
    #[error("Store dropped response channel")]
    StoreDropped,
    #[error("Constraint violation: {0}")]
    Constraint(String),
    #[error("Invalid request: {0}")]
    Invalid(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`ResourceService`](crate::ResourceService) and
/// [`ResourceSync`](crate::ResourceSync).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ResourceError {
    /// A query failed (network, malformed filter, undecodable row).
    #[error("Remote read failed: {0}")]
    RemoteRead(String),

    /// An insert, update or delete was rejected.
    #[error("Remote write failed: {0}")]
    RemoteWrite(String),

    /// Update or delete addressed an id the store does not hold.
    #[error("Record not found: {0}")]
    NotFound(String),
}

impl ResourceError {
    pub(crate) fn read(e: impl std::fmt::Display) -> Self {
        ResourceError::RemoteRead(e.to_string())
    }

    pub(crate) fn write(e: impl std::fmt::Display) -> Self {
        ResourceError::RemoteWrite(e.to_string())
    }
}
