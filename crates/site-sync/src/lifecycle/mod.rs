//! # System Lifecycle & Orchestration
//!
//! This module wires the store, the services and the hooks together and tears
//! them down again.
//!
//! ## The SiteSystem Pattern
//!
//! ```rust,ignore
//! impl SiteSystem {
//!     pub fn with_config(config: SyncConfig) -> Self {
//!         // 1. Create the store (constraints declared up front)
//!         let (actor, store) = StoreActor::new(config.store_buffer);
//!
//!         // 2. Start it
//!         let handle = tokio::spawn(actor.run());
//!
//!         // 3. Inject the shared client into every service
//!         let projects = ProjectService::with_table(Arc::new(store.clone()), ..);
//!         ...
//!     }
//! }
//! ```
//!
//! Services are constructed explicitly and receive the store as an
//! `Arc<dyn RemoteStore>`; nothing is a process-wide singleton, so tests swap in
//! a [`MockStore`](store_framework::mock::MockStore) or a fresh store freely.
//!
//! ## Graceful Shutdown
//!
//! Hooks and services hold clones of the store client, so dropping the
//! system's own client would not stop the actor. [`SiteSystem::shutdown`]
//! sends an explicit `Shutdown` request instead:
//!
//! 1. **Send `Shutdown`** - the actor leaves its loop
//! 2. **Feeds close** - live subscriptions see the end of their channel
//! 3. **Await completion** - the store task is joined
//!
//! Calls made through surviving clients afterwards fail with `StoreClosed`.
//!
//! ## Observability
//!
//! Call [`setup_tracing`](store_framework::telemetry::setup_tracing) once at
//! startup; `RUST_LOG` selects the level.

pub mod site_system;

pub use site_system::*;
