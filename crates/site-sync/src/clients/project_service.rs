//! # Project Service
//!
//! Provides a high-level API over the `projects` table.
//! It wraps a `ResourceService<Project>` and adds the stats aggregate and hook
//! constructors on top of the standard operations inherited from
//! [`ResourceAccess`].
use crate::model::{Project, ProjectStats, StatsSample};
use crate::project_table::wire::{StatsRow, STATS_COLUMNS};
use crate::stats_sync::ProjectStatsSync;
use std::sync::Arc;
use store_framework::{
    from_row, RemoteStore, ResourceAccess, ResourceError, ResourceService, ResourceSync,
    SyncOptions,
};
use tracing::{debug, instrument};

/// Service for the project resource.
#[derive(Clone)]
pub struct ProjectService {
    inner: ResourceService<Project>,
}

impl ResourceAccess<Project> for ProjectService {
    fn inner(&self) -> &ResourceService<Project> {
        &self.inner
    }
}

impl ProjectService {
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

    /// Computes summary statistics over every project, fetching only the
    /// columns the aggregate needs.
    #[instrument(skip(self))]
    pub async fn aggregate(&self) -> Result<ProjectStats, ResourceError> {
        debug!("Sending request");
        let rows = self.inner.select_columns(STATS_COLUMNS).await?;
        let samples = rows
            .into_iter()
            .map(|row| from_row::<StatsRow>(row).map(StatsSample::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ResourceError::RemoteRead(format!("malformed row: {e}")))?;
        Ok(ProjectStats::from_samples(&samples))
    }

    /// Mounts a list hook over this service.
    pub fn sync(&self, options: SyncOptions) -> ResourceSync<Project> {
        ResourceSync::mount(self.inner.clone(), options)
    }

    /// Mounts a stats hook over this service.
    pub fn stats_sync(&self) -> ProjectStatsSync {
        ProjectStatsSync::mount(self.clone())
    }
}
