//! # Project Stats Hook
//!
//! `ProjectStatsSync` holds a [`ProjectStats`] view with the same
//! loading/error shape as a list hook. It loads once on mount and afterwards
//! only on [`refresh`](ProjectStatsSync::refresh); there is no live mode.

use crate::clients::ProjectService;
use crate::model::ProjectStats;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsState {
    pub stats: Option<ProjectStats>,
    pub loading: bool,
    pub error: Option<String>,
}

struct Shared {
    service: ProjectService,
    state: watch::Sender<StatsState>,
    alive: AtomicBool,
}

impl Shared {
    fn commit(&self, change: impl FnOnce(&mut StatsState)) {
        if !self.alive.load(Ordering::SeqCst) {
            debug!("Dropping stats commit on disposed hook");
            return;
        }
        self.state.send_modify(change);
    }

    async fn load(&self) {
        self.commit(|state| {
            state.loading = true;
            state.error = None;
        });
        match self.service.aggregate().await {
            Ok(stats) => self.commit(|state| {
                state.stats = Some(stats);
                state.loading = false;
            }),
            Err(e) => {
                warn!(error = %e, "Stats load failed");
                self.commit(|state| {
                    state.error = Some(e.to_string());
                    state.loading = false;
                });
            }
        }
    }
}

/// Single-shot stats view with manual refresh.
pub struct ProjectStatsSync {
    shared: Arc<Shared>,
    startup: Option<JoinHandle<()>>,
}

impl ProjectStatsSync {
    /// Creates the hook and starts the initial load. Must be called inside a Tokio runtime.
    pub fn mount(service: ProjectService) -> Self {
        let (state, _) = watch::channel(StatsState {
            loading: true,
            ..StatsState::default()
        });
        let shared = Arc::new(Shared {
            service,
            state,
            alive: AtomicBool::new(true),
        });
        let task_shared = Arc::clone(&shared);
        let startup = tokio::spawn(async move { task_shared.load().await });
        info!("Stats hook mounted");
        Self {
            shared,
            startup: Some(startup),
        }
    }

    pub fn state(&self) -> StatsState {
        self.shared.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<StatsState> {
        self.shared.state.subscribe()
    }

    /// Reloads the stats. No-op once disposed.
    pub async fn refresh(&self) {
        if self.is_disposed() {
            return;
        }
        self.shared.load().await;
    }

    pub fn is_disposed(&self) -> bool {
        !self.shared.alive.load(Ordering::SeqCst)
    }

    /// Stops all further commits. Idempotent.
    pub fn dispose(&mut self) {
        if !self.shared.alive.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(startup) = self.startup.take() {
            startup.abort();
        }
        info!("Stats hook disposed");
    }
}

impl Drop for ProjectStatsSync {
    fn drop(&mut self) {
        self.dispose();
    }
}
