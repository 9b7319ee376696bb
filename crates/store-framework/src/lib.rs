//! # Store Framework
//!
//! This crate provides the building blocks for keeping local views of remote
//! tables in sync: a store boundary, a generic data-access service over it, and
//! a stateful "hook" that reconciles loads, writes and pushed changes into one
//! observable view.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into four layers:
//!
//! 1. **Store Layer** ([`RemoteStore`]) - query, write and change-feed capability of a table store
//! 2. **Record Layer** ([`TableRecord`]) - your domain types and their row mappings
//! 3. **Service Layer** ([`ResourceService`], [`ResourceAccess`]) - typed CRUD, search and subscriptions
//! 4. **View Layer** ([`ResourceSync`]) - per-consumer view state with live updates
//!
//! You describe a resource **once** in the record trait; the service and the
//! hook are generic over it.
//!
//! ## The In-Process Store
//!
//! [`StoreActor`] is an actor-model table store. One Tokio task owns all tables
//! and processes requests sequentially; [`StoreClient`] is the cheap, cloneable
//! handle that sends requests over an mpsc channel and awaits each reply on a
//! oneshot channel. Every successful write is broadcast to the table's change
//! feeds.
//!
//! ```rust
//! use store_framework::{Query, RemoteStore, StoreActor};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     // 1. Create the actor and its client
//!     let (actor, store) = StoreActor::new(16);
//!
//!     // 2. Spawn the actor
//!     tokio::spawn(actor.run());
//!
//!     // 3. Use the client
//!     let row = json!({"name": "Tower A"}).as_object().cloned().unwrap();
//!     let stored = store.insert("projects", row).await.unwrap();
//!     assert!(stored.contains_key("id"));
//!
//!     let rows = store.select(Query::table("projects")).await.unwrap();
//!     assert_eq!(rows.len(), 1);
//! }
//! ```
//!
//! ## Services and Hooks
//!
//! ```rust,ignore
//! let projects = ResourceService::<Project>::new(Arc::new(store.clone()));
//!
//! // One-shot: load once on mount
//! let view = ResourceSync::mount(projects.clone(), SyncOptions::one_shot());
//!
//! // Live: follow every change made by anyone
//! let live = ResourceSync::mount(projects, SyncOptions::live());
//! let mut rx = live.watch();
//! rx.changed().await?;
//! ```
//!
//! Writes through a hook always resync the view with a full reload; they never
//! patch the local list optimistically.
//!
//! ## Concurrency Model
//!
//! - The store actor processes requests **sequentially** (no locks on tables)
//! - Each subscription runs in its own task and handles events in order
//! - Hooks commit through a `watch` channel guarded by a liveness flag
//! - Overlapping fetches are not fenced; the last to resolve wins
//!
//! ## Testing
//!
//! The [`mock`] module provides a **MockStore** with scripted replies and
//! receiver helpers for asserting on the exact queries a service sends.

pub mod access;
pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod mock;
pub mod query;
pub mod record;
pub mod row;
pub mod service;
pub mod store;
pub mod subscription;
pub mod sync;
pub mod telemetry;

// Re-export core types for convenience
pub use access::ResourceAccess;
pub use actor::StoreActor;
pub use client::StoreClient;
pub use error::{ResourceError, StoreError};
pub use message::{Response, StoreRequest};
pub use query::{Filter, OrderBy, Query};
pub use record::TableRecord;
pub use row::{from_row, row_id, to_row, Row};
pub use service::ResourceService;
pub use store::RemoteStore;
pub use subscription::{ChangeEvent, ChangeFeed, ChangeKind, Subscription};
pub use sync::{ResourceSync, SyncOptions, SyncPhase, ViewState};
