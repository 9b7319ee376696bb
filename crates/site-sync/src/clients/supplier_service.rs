//! # Supplier Service
//!
//! The supplier registry uses the standard operations only.
use crate::model::Supplier;
use std::sync::Arc;
use store_framework::{RemoteStore, ResourceAccess, ResourceService, ResourceSync, SyncOptions};

/// Service for the supplier resource.
#[derive(Clone)]
pub struct SupplierService {
    inner: ResourceService<Supplier>,
}

impl ResourceAccess<Supplier> for SupplierService {
    fn inner(&self) -> &ResourceService<Supplier> {
        &self.inner
    }
}

impl SupplierService {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        Self {
            inner: ResourceService::new(store),
        }
    }

    pub fn with_table(store: Arc<dyn RemoteStore>, table: impl Into<String>) -> Self {
        Self {
            inner: ResourceService::with_table(store, table),
        }
    }

    pub fn sync(&self, options: SyncOptions) -> ResourceSync<Supplier> {
        ResourceSync::mount(self.inner.clone(), options)
    }
}
