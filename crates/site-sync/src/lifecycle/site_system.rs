use crate::clients::{ProjectService, SupplierService};
use crate::config::SyncConfig;
use crate::model::{Project, Supplier};
use crate::project_table::NON_NEGATIVE_COLUMNS;
use crate::stats_sync::ProjectStatsSync;
use std::sync::Arc;
use store_framework::{ResourceSync, StoreActor, StoreClient, StoreError};
use tokio::task::JoinHandle;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Store shutdown failed: {0}")]
    Store(#[from] StoreError),
    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Owns the store task and the services built on it.
pub struct SiteSystem {
    pub store: StoreClient,
    pub projects: ProjectService,
    pub suppliers: SupplierService,
    pub config: SyncConfig,
    handle: JoinHandle<()>,
}

impl SiteSystem {
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    pub fn with_config(config: SyncConfig) -> Self {
        // 1. Create the store with the project table's constraints
        let (actor, store) = StoreActor::new(config.store_buffer.max(1));
        let actor = actor.with_non_negative(&config.projects_table, NON_NEGATIVE_COLUMNS);

        // 2. Start it
        let handle = tokio::spawn(actor.run());

        // 3. Inject the shared client into every service
        let shared: Arc<StoreClient> = Arc::new(store.clone());
        let projects = ProjectService::with_table(shared.clone(), config.projects_table.clone());
        let suppliers = SupplierService::with_table(shared, config.suppliers_table.clone());

        info!(
            projects = %config.projects_table,
            suppliers = %config.suppliers_table,
            "Site system started"
        );
        Self {
            store,
            projects,
            suppliers,
            config,
            handle,
        }
    }

    /// Project list hook with the configured default options.
    pub fn project_sync(&self) -> ResourceSync<Project> {
        self.projects.sync(self.config.sync_options())
    }

    /// Supplier list hook with the configured default options.
    pub fn supplier_sync(&self) -> ResourceSync<Supplier> {
        self.suppliers.sync(self.config.sync_options())
    }

    pub fn project_stats(&self) -> ProjectStatsSync {
        self.projects.stats_sync()
    }

    /// Stops the store and waits for its task. Live feeds end when it exits.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down site system");
        self.store.shutdown().await?;
        self.handle.await?;
        info!("Site system stopped");
        Ok(())
    }
}

impl Default for SiteSystem {
    fn default() -> Self {
        Self::new()
    }
}
