use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
/// Host event fan-out
///
/// Hooks publish from whichever thread the host calls them on; each
/// subscriber drains its own channel on its own schedule.
use std::sync::Arc;

use super::events::HostEvent;

/// Handle for removing a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(usize);

struct Subscriber {
    id: SubscriberId,
    sender: Sender<HostEvent>,
}

/// Broadcasts [`HostEvent`]s to every subscriber
///
/// Clones share the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Vec<Subscriber>>>,
    next_id: Arc<Mutex<usize>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> (Receiver<HostEvent>, SubscriberId) {
        let (tx, rx) = unbounded();

        let id = {
            let mut next_id = self.next_id.lock();
            let id = SubscriberId(*next_id);
            *next_id += 1;
            id
        };

        self.subscribers.write().push(Subscriber { id, sender: tx });
        tracing::debug!("Event subscriber {:?} added", id);

        (rx, id)
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.subscribers.write().retain(|s| s.id != id);
    }

    /// Deliver to all live subscribers; returns how many received it
    ///
    /// Subscribers whose receiver was dropped are removed.
    pub fn publish(&self, event: HostEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for subscriber in self.subscribers.read().iter() {
            match subscriber.sender.try_send(event) {
                Ok(()) => delivered += 1,
                Err(_) => closed.push(subscriber.id),
            }
        }

        if !closed.is_empty() {
            tracing::debug!("Dropping {} closed event subscribers", closed.len());
            self.subscribers.write().retain(|s| !closed.contains(&s.id));
        }

        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::events::GameEvent;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();
        let (_rx, id) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        bus.unsubscribe(id);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let bus = EventBus::new();
        let (rx1, _) = bus.subscribe();
        let (rx2, _) = bus.subscribe();

        let event = HostEvent::Game(GameEvent::match_ended());
        assert_eq!(bus.publish(event), 2);

        assert_eq!(rx1.try_recv().unwrap(), event);
        assert_eq!(rx2.try_recv().unwrap(), event);
    }

    #[test]
    fn test_events_keep_order() {
        let bus = EventBus::new();
        let (rx, _) = bus.subscribe();

        bus.publish(HostEvent::ScoreUpdated);
        bus.publish(HostEvent::InputUpdated);

        let received: Vec<HostEvent> = rx.try_iter().collect();
        assert_eq!(received, vec![HostEvent::ScoreUpdated, HostEvent::InputUpdated]);
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let (rx, _) = bus.subscribe();
        drop(rx);
        let (_live, _) = bus.subscribe();

        assert_eq!(bus.publish(HostEvent::ScoreUpdated), 1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_clone_shares_subscribers() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let (_rx, _) = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);

        bus2.clear();
        assert_eq!(bus1.subscriber_count(), 0);
    }

    #[test]
    fn test_publish_from_other_thread() {
        let bus = EventBus::new();
        let (rx, _) = bus.subscribe();

        let publisher = bus.clone();
        std::thread::spawn(move || {
            publisher.publish(HostEvent::ScoreUpdated);
        })
        .join()
        .unwrap();

        assert_eq!(rx.try_recv().unwrap(), HostEvent::ScoreUpdated);
    }
}
