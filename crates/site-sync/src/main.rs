//! # Site Sync Demo
//!
//! Runs the dashboard data layer against the in-process store:
//! 1.  Starts a [`SiteSystem`] from configuration.
//! 2.  Mounts a live project view and a stats view.
//! 3.  Creates, updates and deletes projects and watches the live view follow.

use site_sync::config::SyncConfig;
use site_sync::lifecycle::SiteSystem;
use site_sync::model::{ProjectCreate, ProjectFilter, ProjectStatus, ProjectUpdate, SupplierCreate};
use std::time::Duration;
use store_framework::telemetry::setup_tracing;
use store_framework::{ResourceAccess, SyncOptions};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = SyncConfig::load().map_err(|e| e.to_string())?;
    info!(?config, "Starting site sync demo");

    let system = SiteSystem::with_config(config);

    // Live view of every project
    let live = system.projects.sync(SyncOptions::live());
    let mut view = live.watch();

    let span = tracing::info_span!("project_creation");
    let tower = async {
        info!("Creating projects");
        let tower = system
            .projects
            .create(ProjectCreate::new(
                "Tower A",
                "Acme",
                ProjectStatus::Planning,
                1_000_000.0,
            ))
            .await
            .map_err(|e| e.to_string())?;
        system
            .projects
            .create(
                ProjectCreate::new("Riverside Bridge", "City Works", ProjectStatus::Active, 250_000.0)
                    .location("North bank"),
            )
            .await
            .map_err(|e| e.to_string())?;
        Ok::<_, String>(tower)
    }
    .instrument(span)
    .await?;
    info!(project_id = %tower, "Projects created");

    let span = tracing::info_span!("live_update");
    async {
        system
            .projects
            .update(&tower, ProjectUpdate::status(ProjectStatus::Active))
            .await
            .map_err(|e| e.to_string())?;
        let seen = tokio::time::timeout(
            Duration::from_secs(2),
            view.wait_for(|state| {
                state
                    .records
                    .iter()
                    .any(|p| p.id == tower && p.status == ProjectStatus::Active)
            }),
        )
        .await;
        match seen {
            Ok(Ok(_)) => info!("Live view picked up the status change"),
            _ => error!("Live view did not follow the update"),
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let found = system
        .projects
        .search(&ProjectFilter::term("acme"))
        .await
        .map_err(|e| e.to_string())?;
    info!(matches = found.len(), "Searched for \"acme\"");

    // Rejected by the store: budgets are non-negative
    let rejected = system
        .projects
        .update(
            &tower,
            ProjectUpdate {
                budget: Some(-1.0),
                ..ProjectUpdate::default()
            },
        )
        .await;
    if let Err(e) = rejected {
        info!(error = %e, "Negative budget rejected");
    }

    let stats = system.project_stats();
    stats.refresh().await;
    if let Some(stats) = stats.state().stats {
        info!(
            total = stats.total,
            active = stats.count(ProjectStatus::Active),
            budget = stats.total_budget,
            average_progress = stats.average_progress,
            "Project stats"
        );
    }

    let supplier = system
        .suppliers
        .create(SupplierCreate::new("Cimento Norte"))
        .await
        .map_err(|e| e.to_string())?;
    info!(supplier_id = %supplier, "Supplier registered");

    system
        .projects
        .delete(&tower)
        .await
        .map_err(|e| e.to_string())?;
    let remaining = tokio::time::timeout(
        Duration::from_secs(2),
        view.wait_for(|state| state.records.iter().all(|p| p.id != tower)),
    )
    .await
    .ok()
    .and_then(Result::ok)
    .map(|state| state.records.len());
    info!(?remaining, "Project deleted");

    drop(stats);
    drop(live);

    // Shutdown system gracefully
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
