//! # Conflated broadcast bus (latest-value cache).
//!
//! [`ConflatedBus`] carries the state and lifecycle streams. On top of the
//! plain fan-out it remembers the most recently published value and hands it
//! to every new subscription as its first item.
//!
//! Publishing and subscribing take the same lock, so a new subscription sees
//! either the cached value followed by strictly later items, never a gap and
//! never a duplicate.

use parking_lot::Mutex;

use super::{Bus, Subscription};

/// Fan-out bus that replays the latest value to new subscribers.
#[derive(Debug)]
pub struct ConflatedBus<T> {
    bus: Bus<T>,
    latest: Mutex<Option<T>>,
}

impl<T: Clone + Send + 'static> Default for ConflatedBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> ConflatedBus<T> {
    /// Creates an empty bus (no cached value yet).
    pub fn new() -> Self {
        Self {
            bus: Bus::new(),
            latest: Mutex::new(None),
        }
    }

    /// Caches `item` as the latest value and publishes it.
    pub fn publish(&self, item: T) {
        let mut latest = self.latest.lock();
        *latest = Some(item.clone());
        self.bus.publish(item);
    }

    /// Opens a subscription whose first item is the latest value, if any.
    pub fn subscribe(&self) -> Subscription<T> {
        let latest = self.latest.lock();
        Subscription::new(latest.clone(), self.bus.register())
    }

    /// Returns a clone of the latest value.
    pub fn latest(&self) -> Option<T> {
        self.latest.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn new_subscriber_gets_latest_first() {
        let bus = ConflatedBus::<u32>::new();
        bus.publish(1);
        bus.publish(2);

        let mut sub = bus.subscribe();
        assert_eq!(sub.recv().await, Some(2));

        bus.publish(3);
        assert_eq!(sub.recv().await, Some(3));
    }

    #[tokio::test]
    async fn empty_bus_has_nothing_to_replay() {
        let bus = ConflatedBus::<u32>::new();
        let mut sub = bus.subscribe();
        assert_eq!(sub.try_recv(), None);
        assert_eq!(bus.latest(), None);
    }

    #[tokio::test]
    async fn early_subscriber_sees_full_sequence() {
        let bus = ConflatedBus::<u32>::new();
        let mut sub = bus.subscribe();
        for i in 0..4 {
            bus.publish(i);
        }
        for i in 0..4 {
            assert_eq!(sub.recv().await, Some(i));
        }
        assert_eq!(bus.latest(), Some(3));
    }
}
