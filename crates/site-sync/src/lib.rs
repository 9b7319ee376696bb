//! # Site Sync
//!
//! The live data layer of a construction-project dashboard, built on
//! [`store_framework`].
//!
//! ## Core Components
//!
//! - **[model]**: domain records ([`Project`](model::Project), [`Supplier`](model::Supplier)) and the [`ProjectStats`](model::ProjectStats) aggregate.
//! - **[project_table] / [supplier_table]**: how each record maps to its table's rows.
//! - **[clients]**: resource services ([`ProjectService`](clients::ProjectService), [`SupplierService`](clients::SupplierService)).
//! - **[stats_sync]**: the stats hook.
//! - **[config]**: TOML and environment configuration.
//! - **[lifecycle]**: [`SiteSystem`](lifecycle::SiteSystem), which starts and stops everything.
//!
//! ## Testing
//!
//! See [`store_framework::mock`] for utilities to test services without a running store.

pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod project_table;
pub mod stats_sync;
pub mod supplier_table;
