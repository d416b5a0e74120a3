//! Fire-and-forget progression event delivery.
//!
//! State transitions push onto an unbounded in-process queue; a notifier
//! task drains it and fans out to subscribers over a broadcast channel. A
//! delivery failure is logged and never rolls back or fails the state
//! change that produced the event.

use tokio::sync::{broadcast, mpsc};

use crate::models::event::ProgressionEvent;

const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct EventBus {
    queue: mpsc::UnboundedSender<ProgressionEvent>,
    fanout: broadcast::Sender<ProgressionEvent>,
}

impl EventBus {
    /// Spawns the notifier task; must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (queue, mut rx) = mpsc::unbounded_channel::<ProgressionEvent>();
        let (fanout, _) = broadcast::channel(BROADCAST_CAPACITY);

        let fanout_tx = fanout.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                // send only fails when nobody is subscribed, which is not a
                // delivery fault.
                if fanout_tx.send(event.clone()).is_err() {
                    tracing::debug!(
                        "no subscribers for progression event {}",
                        event.event_name()
                    );
                }
            }
        });

        Self { queue, fanout }
    }

    /// Never blocks and never fails the caller.
    pub fn publish(&self, event: ProgressionEvent) {
        tracing::debug!(
            "publishing {} for customer quest {}",
            event.event_name(),
            event.customer_quest_id()
        );
        if let Err(e) = self.queue.send(event) {
            tracing::error!("progression event delivery fault: {}", e);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProgressionEvent> {
        self.fanout.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CustomerTask;

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        let task = CustomerTask::started("cq-1", "item-1", 1000.0);
        bus.publish(ProgressionEvent::CustomerTaskAdded((&task).into()));

        let event = tokio::time::timeout(std::time::Duration::from_secs(1), rx.recv())
            .await
            .expect("event not delivered in time")
            .expect("broadcast channel closed");
        assert_eq!(event.event_name(), "customer-task-added");
        assert_eq!(event.customer_quest_id(), "cq-1");
    }

    #[tokio::test]
    async fn publishing_without_subscribers_does_not_fail() {
        let bus = EventBus::new();
        let task = CustomerTask::started("cq-2", "item-1", 100.0);
        bus.publish(ProgressionEvent::CustomerTaskUpdated((&task).into()));
        // Queue drain happens on the notifier task; nothing to assert beyond
        // the publish not panicking.
        tokio::task::yield_now().await;
    }
}
