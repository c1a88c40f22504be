use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

type Senders<T> = Mutex<Vec<(u64, mpsc::UnboundedSender<T>)>>;

/// Fan-out registry of snapshot subscribers.
pub struct SubscriberRegistry<T> {
    senders: Arc<Senders<T>>,
    next_id: AtomicU64,
}

impl<T: Clone> SubscriberRegistry<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            senders: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a subscriber and hand it `initial` right away.
    pub fn subscribe(&self, initial: T) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        // The receiver is alive, so this cannot fail.
        let _ = tx.send(initial);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.senders.lock().push((id, tx));
        Subscription {
            id,
            receiver: rx,
            registry: Arc::downgrade(&self.senders),
        }
    }

    /// Deliver a snapshot to every live subscriber, pruning closed channels.
    pub fn publish(&self, snapshot: &T) {
        let mut senders = self.senders.lock();
        senders.retain(|(id, sender)| {
            let delivered = sender.send(snapshot.clone()).is_ok();
            if !delivered {
                debug!(subscriber = id, "dropping closed subscriber");
            }
            delivered
        });
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.senders.lock().len()
    }

    /// No subscriber is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposable handle over a stream of full snapshots.
///
/// Dropping the handle disposes it as well.
pub struct Subscription<T> {
    id: u64,
    receiver: mpsc::UnboundedReceiver<T>,
    registry: Weak<Senders<T>>,
}

impl<T> Subscription<T> {
    /// Wait for the next snapshot. `None` once the store is gone.
    pub async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Latest pending snapshot without waiting, skipping stale ones.
    pub fn try_latest(&mut self) -> Option<T> {
        let mut latest = None;
        while let Ok(snapshot) = self.receiver.try_recv() {
            latest = Some(snapshot);
        }
        latest
    }

    /// Stop deliveries and release the channel.
    pub fn dispose(self) {}

    fn unregister(&mut self) {
        if let Some(senders) = self.registry.upgrade() {
            senders.lock().retain(|(id, _)| *id != self.id);
        }
        self.receiver.close();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.unregister();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_initial_then_published_snapshots() {
        let registry = SubscriberRegistry::new();
        let mut subscription = registry.subscribe(vec![1]);
        registry.publish(&vec![1, 2]);

        assert_eq!(subscription.next().await, Some(vec![1]));
        assert_eq!(subscription.next().await, Some(vec![1, 2]));
    }

    #[test]
    fn try_latest_skips_stale_snapshots() {
        let registry = SubscriberRegistry::new();
        let mut subscription = registry.subscribe(0);
        registry.publish(&1);
        registry.publish(&2);
        assert_eq!(subscription.try_latest(), Some(2));
        assert_eq!(subscription.try_latest(), None);
    }

    #[test]
    fn dispose_unregisters_subscriber() {
        let registry = SubscriberRegistry::new();
        let first = registry.subscribe(0u8);
        let _second = registry.subscribe(0u8);
        assert_eq!(registry.len(), 2);

        first.dispose();
        assert_eq!(registry.len(), 1);
        registry.publish(&1);
        assert_eq!(registry.len(), 1);
    }
}
