//! # Pure fan-out broadcast bus.
//!
//! [`Bus`] is used for the action, reducer and event streams. Every
//! subscription owns an unbounded [`tokio::sync::mpsc`] queue; `publish`
//! pushes a clone of the item into each of them.
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never waits on a subscriber.
//! - **Lossless**: a subscription sees every item published after it was
//!   opened, however far behind it is.
//! - **No replay**: items published before a subscription opened are not seen.
//! - **No persistence**: items are lost if there are no open subscriptions at send time.
//! - **Pruning**: queues whose subscription was closed or dropped are removed on the next publish.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::Subscription;

/// Fan-out channel for one item kind.
///
/// Cloning is cheap and every clone publishes to the same subscriptions.
/// Subscriptions end once the last clone is dropped.
#[derive(Debug)]
pub struct Bus<T> {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<T>>>>,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone + Send + 'static> Default for Bus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> Bus<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Publishes an item to every open subscription.
    ///
    /// If there are no subscriptions the item is dropped; this still returns immediately.
    pub fn publish(&self, item: T) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(item.clone()).is_ok());
    }

    /// Opens a new independent subscription that sees subsequent items only.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription::new(None, self.register())
    }

    /// Number of currently open subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    pub(crate) fn register(&self) -> mpsc::UnboundedReceiver<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscription_sees_every_item() {
        let bus = Bus::<u32>::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(1);
        bus.publish(2);

        assert_eq!(a.recv().await, Some(1));
        assert_eq!(a.recv().await, Some(2));
        assert_eq!(b.recv().await, Some(1));
        assert_eq!(b.recv().await, Some(2));
    }

    #[tokio::test]
    async fn late_subscription_gets_no_replay() {
        let bus = Bus::<&'static str>::new();
        bus.publish("before");
        let mut sub = bus.subscribe();
        assert_eq!(sub.try_recv(), None);

        bus.publish("after");
        assert_eq!(sub.recv().await, Some("after"));
    }

    #[tokio::test]
    async fn closed_subscription_is_detached() {
        let bus = Bus::<u8>::new();
        let mut sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        sub.close();
        assert_eq!(bus.subscriber_count(), 0);
        bus.publish(7);
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn slow_subscription_loses_nothing() {
        let bus = Bus::<u32>::new();
        let mut sub = bus.subscribe();
        for i in 0..5_000 {
            bus.publish(i);
        }
        for i in 0..5_000 {
            assert_eq!(sub.recv().await, Some(i));
        }
        assert_eq!(sub.try_recv(), None);
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_pruned_on_publish() {
        let bus = Bus::<u32>::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(1);
        assert_eq!(bus.subscribers.lock().len(), 1);
        drop(keep);
    }
}
