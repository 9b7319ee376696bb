//! # Change Feeds & Subscriptions
//!
//! A [`ChangeFeed`] is the raw, table-scoped notification channel a store hands
//! out. Events carry no row payload: they only say that *something* changed, so
//! consumers re-fetch.
//!
//! A [`Subscription`] is the handle a service returns after wiring a feed to a
//! snapshot callback. Closing it is idempotent and also happens on drop.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What kind of write produced a change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Opaque "the table changed" notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: String,
    pub kind: ChangeKind,
}

/// Receiving end of a table's change channel.
#[derive(Debug)]
pub struct ChangeFeed {
    table: String,
    receiver: broadcast::Receiver<ChangeEvent>,
}

impl ChangeFeed {
    pub fn new(table: impl Into<String>, receiver: broadcast::Receiver<ChangeEvent>) -> Self {
        Self {
            table: table.into(),
            receiver,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Waits for the next change. Returns `None` once the store closes the channel.
    ///
    /// A lagged receiver still reports a change: the consumer re-fetches the
    /// full set anyway, so skipped notifications lose nothing.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(table = %self.table, skipped, "Change feed lagged");
                Some(ChangeEvent {
                    table: self.table.clone(),
                    kind: ChangeKind::Update,
                })
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }
}

/// Handle to a live snapshot subscription.
#[derive(Debug)]
pub struct Subscription {
    table: String,
    task: JoinHandle<()>,
    closed: AtomicBool,
}

impl Subscription {
    pub fn new(table: impl Into<String>, task: JoinHandle<()>) -> Self {
        Self {
            table: table.into(),
            task,
            closed: AtomicBool::new(false),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Closes the channel. Returns `true` only for the call that actually closed it.
    pub fn unsubscribe(&self) -> bool {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!(table = %self.table, "Already unsubscribed");
            return false;
        }
        self.task.abort();
        info!(table = %self.table, "Unsubscribed");
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let task = tokio::spawn(std::future::pending::<()>());
        let subscription = Subscription::new("projects", task);

        assert!(!subscription.is_closed());
        assert!(subscription.unsubscribe());
        assert!(subscription.is_closed());
        assert!(!subscription.unsubscribe());
    }

    #[tokio::test]
    async fn test_feed_ends_when_sender_drops() {
        let (sender, receiver) = broadcast::channel(4);
        let mut feed = ChangeFeed::new("projects", receiver);

        sender
            .send(ChangeEvent {
                table: "projects".into(),
                kind: ChangeKind::Insert,
            })
            .unwrap();
        drop(sender);

        assert_eq!(feed.next().await.map(|e| e.kind), Some(ChangeKind::Insert));
        assert!(feed.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_feed_still_reports_change() {
        let (sender, receiver) = broadcast::channel(1);
        let mut feed = ChangeFeed::new("projects", receiver);

        for kind in [ChangeKind::Insert, ChangeKind::Delete, ChangeKind::Insert] {
            sender
                .send(ChangeEvent {
                    table: "projects".into(),
                    kind,
                })
                .unwrap();
        }

        assert!(feed.next().await.is_some());
    }
}
