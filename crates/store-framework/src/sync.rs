//! # Resource Sync Hook
//!
//! `ResourceSync<T>` is the per-consumer controller that keeps a local view of
//! one table consistent with the store. It reconciles three independent
//! triggers of change:
//!
//! 1. the initial load when the hook is mounted,
//! 2. mutations issued through the hook (each followed by a full reload),
//! 3. snapshots pushed by a live subscription.
//!
//! The view lives in a [`tokio::sync::watch`] channel. Consumers read it with
//! [`ResourceSync::state`] or follow it with [`ResourceSync::watch`].
//!
//! ## Modes
//!
//! | `auto_load` | `real_time` | On mount |
//! |---|---|---|
//! | `false` | any | stays `Idle` until `load`/`search` |
//! | `true` | `false` | one `list()`, then `Ready` or `Error` |
//! | `true` | `true` | subscribes, primes with one `list()`; pushes replace records |
//!
//! ## Disposal
//!
//! After [`ResourceSync::dispose`] (or drop) nothing commits to the view, even
//! fetches that were already in flight, and the live subscription has been
//! closed exactly once.
//!
//! Overlapping fetches are not fenced: whichever resolves last wins.

use crate::error::ResourceError;
use crate::record::TableRecord;
use crate::service::ResourceService;
use crate::subscription::Subscription;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// How a hook wires itself to its service on mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub auto_load: bool,
    /// Only takes effect together with `auto_load`.
    pub real_time: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            auto_load: true,
            real_time: false,
        }
    }
}

impl SyncOptions {
    pub fn one_shot() -> Self {
        Self::default()
    }

    pub fn live() -> Self {
        Self {
            auto_load: true,
            real_time: true,
        }
    }

    pub fn manual() -> Self {
        Self {
            auto_load: false,
            real_time: false,
        }
    }
}

/// Coarse state of a view, derived from [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Loading,
    Ready,
    Error,
}

/// The consumer-visible view of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<T> {
    /// Store order, newest-created first.
    pub records: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Whether any fetch or snapshot has completed.
    pub loaded: bool,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: false,
            error: None,
            loaded: false,
        }
    }
}

impl<T> ViewState<T> {
    pub fn phase(&self) -> SyncPhase {
        if self.loading {
            SyncPhase::Loading
        } else if self.error.is_some() {
            SyncPhase::Error
        } else if self.loaded {
            SyncPhase::Ready
        } else {
            SyncPhase::Idle
        }
    }
}

/// State shared between the hook and the tasks it spawns.
struct Shared<T: TableRecord> {
    service: ResourceService<T>,
    state: watch::Sender<ViewState<T>>,
    alive: AtomicBool,
    /// Set while a live mount waits for its first snapshot.
    awaiting_first: AtomicBool,
}

impl<T: TableRecord> Shared<T> {
    /// Applies `change` unless the hook has been disposed.
    fn commit(&self, change: impl FnOnce(&mut ViewState<T>)) {
        if !self.alive.load(Ordering::SeqCst) {
            debug!(table = %self.service.table(), "Dropping commit on disposed hook");
            return;
        }
        self.state.send_modify(change);
    }

    fn begin(&self) {
        self.commit(|state| {
            state.loading = true;
            state.error = None;
        });
    }

    fn finish(&self, result: Result<Vec<T>, ResourceError>) {
        match result {
            Ok(records) => {
                debug!(table = %self.service.table(), count = records.len(), "View loaded");
                self.commit(|state| {
                    state.records = records;
                    state.loaded = true;
                    state.loading = false;
                });
            }
            Err(e) => {
                warn!(table = %self.service.table(), error = %e, "View load failed");
                self.commit(|state| {
                    state.error = Some(e.to_string());
                    state.loading = false;
                });
            }
        }
    }

    fn deliver_snapshot(&self, records: Vec<T>) {
        let first = self.awaiting_first.swap(false, Ordering::SeqCst);
        debug!(table = %self.service.table(), count = records.len(), first, "Snapshot");
        self.commit(|state| {
            state.records = records;
            state.loaded = true;
            state.error = None;
            if first {
                state.loading = false;
            }
        });
    }

    fn record_error(&self, error: &ResourceError) {
        self.commit(|state| state.error = Some(error.to_string()));
    }

    /// Ends a mount attempt whose startup task was aborted before it finished.
    fn abandon_startup(&self) {
        self.awaiting_first.store(false, Ordering::SeqCst);
        self.commit(|state| state.loading = false);
    }

    async fn load(&self) {
        self.begin();
        let result = self.service.list().await;
        self.finish(result);
    }
}

/// What a single mount set up: a startup task and, in live mode, a subscription.
struct Wiring {
    startup: JoinHandle<()>,
    link: Arc<Mutex<Link>>,
}

#[derive(Default)]
struct Link {
    closed: bool,
    subscription: Option<Subscription>,
}

impl Wiring {
    /// Returns `true` when the startup task was still pending and got aborted.
    fn tear_down(self) -> bool {
        let pending = !self.startup.is_finished();
        self.startup.abort();
        let subscription = {
            let mut link = self.link.lock().unwrap_or_else(|p| p.into_inner());
            link.closed = true;
            link.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
        pending
    }
}

/// Stateful controller keeping a [`ViewState`] in sync with one table.
pub struct ResourceSync<T: TableRecord> {
    shared: Arc<Shared<T>>,
    options: SyncOptions,
    wiring: Option<Wiring>,
}

impl<T: TableRecord> ResourceSync<T> {
    /// Creates the hook and applies `options`. Must be called inside a Tokio runtime.
    pub fn mount(service: ResourceService<T>, options: SyncOptions) -> Self {
        let (state, _) = watch::channel(ViewState::default());
        let shared = Arc::new(Shared {
            service,
            state,
            alive: AtomicBool::new(true),
            awaiting_first: AtomicBool::new(false),
        });
        let mut hook = Self {
            shared,
            options,
            wiring: None,
        };
        hook.wiring = hook.wire();
        info!(table = %hook.shared.service.table(), ?options, "Hook mounted");
        hook
    }

    pub fn options(&self) -> SyncOptions {
        self.options
    }

    pub fn is_disposed(&self) -> bool {
        !self.shared.alive.load(Ordering::SeqCst)
    }

    /// Current view snapshot.
    pub fn state(&self) -> ViewState<T> {
        self.shared.state.borrow().clone()
    }

    /// Receiver that observes every committed change to the view.
    pub fn watch(&self) -> watch::Receiver<ViewState<T>> {
        self.shared.state.subscribe()
    }

    /// Fetches every record into the view. Failures land in `error`.
    /// No-op once disposed.
    pub async fn load(&self) {
        if self.is_disposed() {
            return;
        }
        self.shared.load().await;
    }

    /// Same as [`load`](Self::load).
    pub async fn refresh(&self) {
        self.load().await;
    }

    /// Fetches records matching `filter` into the view. Failures land in `error`.
    pub async fn search(&self, filter: &T::Filter) {
        if self.is_disposed() {
            return;
        }
        self.shared.begin();
        let result = self.shared.service.search(filter).await;
        self.shared.finish(result);
    }

    /// Creates a record, then reloads the view.
    pub async fn create(&self, params: T::Create) -> Result<T::Id, ResourceError> {
        match self.shared.service.create(params).await {
            Ok(id) => {
                self.shared.load().await;
                Ok(id)
            }
            Err(e) => {
                self.shared.record_error(&e);
                Err(e)
            }
        }
    }

    /// Patches a record, then reloads the view.
    pub async fn update(&self, id: &T::Id, update: T::Update) -> Result<(), ResourceError> {
        self.after_write(self.shared.service.update(id, update).await)
            .await
    }

    /// Deletes a record, then reloads the view.
    pub async fn delete(&self, id: &T::Id) -> Result<(), ResourceError> {
        self.after_write(self.shared.service.delete(id).await).await
    }

    /// Tears down the current wiring, then applies `options` as on mount.
    pub fn reconfigure(&mut self, options: SyncOptions) {
        if self.is_disposed() {
            warn!(table = %self.shared.service.table(), "Reconfigure on disposed hook ignored");
            return;
        }
        if let Some(wiring) = self.wiring.take() {
            if wiring.tear_down() {
                self.shared.abandon_startup();
            }
        }
        self.options = options;
        self.wiring = self.wire();
        info!(table = %self.shared.service.table(), ?options, "Hook reconfigured");
    }

    /// Stops all commits and closes the live subscription. Idempotent.
    pub fn dispose(&mut self) {
        if !self.shared.alive.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(wiring) = self.wiring.take() {
            wiring.tear_down();
        }
        info!(table = %self.shared.service.table(), "Hook disposed");
    }

    async fn after_write(&self, result: Result<(), ResourceError>) -> Result<(), ResourceError> {
        match result {
            Ok(()) => {
                self.shared.load().await;
                Ok(())
            }
            Err(e) => {
                self.shared.record_error(&e);
                Err(e)
            }
        }
    }

    fn wire(&self) -> Option<Wiring> {
        if !self.options.auto_load {
            return None;
        }
        let shared = Arc::clone(&self.shared);
        let link = Arc::new(Mutex::new(Link::default()));

        shared.begin();
        let startup = if self.options.real_time {
            shared.awaiting_first.store(true, Ordering::SeqCst);
            let link = Arc::clone(&link);
            tokio::spawn(async move { go_live(shared, link).await })
        } else {
            tokio::spawn(async move {
                let result = shared.service.list().await;
                shared.finish(result);
            })
        };

        Some(Wiring { startup, link })
    }
}

async fn go_live<T: TableRecord>(shared: Arc<Shared<T>>, link: Arc<Mutex<Link>>) {
    let sink = Arc::clone(&shared);
    let subscription = match shared
        .service
        .subscribe(move |records| sink.deliver_snapshot(records))
        .await
    {
        Ok(subscription) => subscription,
        Err(e) => {
            warn!(table = %shared.service.table(), error = %e, "Subscription failed");
            shared.awaiting_first.store(false, Ordering::SeqCst);
            shared.finish(Err(e));
            return;
        }
    };

    {
        let mut link = link.lock().unwrap_or_else(|p| p.into_inner());
        if link.closed {
            drop(link);
            subscription.unsubscribe();
            return;
        }
        link.subscription = Some(subscription);
    }

    // Prime the view; the channel only speaks after the next change.
    match shared.service.list().await {
        Ok(records) => shared.deliver_snapshot(records),
        Err(e) => {
            shared.awaiting_first.store(false, Ordering::SeqCst);
            shared.finish(Err(e));
        }
    }
}

impl<T: TableRecord> Drop for ResourceSync<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
