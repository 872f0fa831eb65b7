//! In-process sync bus
//!
//! Every repository-level change is published here as a [`SyncEvent`] and
//! fanned out to all live subscribers (in-process views and the TCP feed).

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use shared::SyncEvent;

/// Broadcast bus for change events.
#[derive(Debug, Clone)]
pub struct SyncBus {
    tx: broadcast::Sender<SyncEvent>,
    shutdown: CancellationToken,
}

impl SyncBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            shutdown: CancellationToken::new(),
        }
    }

    /// Publish an event to all current subscribers. Returns the number of
    /// receivers that saw it; zero subscribers is not an error.
    pub fn publish(&self, event: SyncEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    /// Subscribe for change events. The returned handle unsubscribes when
    /// dropped, so a subscription can never outlive its consumer.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Signal shutdown to the TCP feed and any long-running consumers.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

impl Default for SyncBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// RAII subscription handle.
pub struct Subscription {
    rx: broadcast::Receiver<SyncEvent>,
}

impl Subscription {
    /// Receive the next event. `None` means the bus is gone. A slow
    /// subscriber that lagged behind skips the lost events and keeps
    /// receiving; the per-resource versions let it detect the gap.
    pub async fn recv(&mut self) -> Option<SyncEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "sync subscriber lagged, skipping");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking drain of everything currently queued.
    pub fn try_recv(&mut self) -> Option<SyncEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::SyncAction;

    fn event(version: u64) -> SyncEvent {
        SyncEvent::new("product", version, SyncAction::Updated, "product:p1", None)
    }

    #[tokio::test]
    async fn events_reach_all_subscribers() {
        let bus = SyncBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();
        assert_eq!(bus.publish(event(1)), 2);
        assert_eq!(a.recv().await.unwrap().version, 1);
        assert_eq!(b.recv().await.unwrap().version, 1);
    }

    #[tokio::test]
    async fn dropping_the_handle_unsubscribes() {
        let bus = SyncBus::default();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        // Publishing into the void is fine
        assert_eq!(bus.publish(event(1)), 0);
    }
}
