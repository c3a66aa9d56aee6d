//! Broadcast hub fanning state updates out to connected viewer sessions.
//!
//! Uses a single `tokio::sync::broadcast` channel. Each session subscribes
//! and receives updates in dispatch order, so every viewer observes the
//! sequence of applied updates without reordering. A broken or slow session
//! only affects its own receiver.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::player::StateUpdate;

/// Capacity of the broadcast channel. Receivers that fall this far behind
/// skip to the oldest retained update (`RecvError::Lagged`).
const BROADCAST_CAPACITY: usize = 256;

/// The fan-out hub. Cloneable — store in `AppState`.
#[derive(Clone)]
pub struct EventBroadcast {
    sender: broadcast::Sender<Arc<StateUpdate>>,
}

impl EventBroadcast {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { sender }
    }

    /// Subscribe to the hub. Each viewer session calls this once, before it
    /// snapshots the current state for its welcome push.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<StateUpdate>> {
        self.sender.subscribe()
    }

    /// Dispatch an update to all connected sessions.
    pub fn dispatch(&self, update: StateUpdate) {
        // send() returns Err when no viewer is connected — that's fine.
        let _ = self.sender.send(Arc::new(update));
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_updates_in_dispatch_order() {
        let hub = EventBroadcast::new();
        let mut rx = hub.subscribe();

        for command in ["songstart", "songfinish"] {
            let update = StateUpdate {
                command: Some(command.to_string()),
                ..StateUpdate::default()
            };
            hub.dispatch(update);
        }

        assert_eq!(rx.recv().await.unwrap().command.as_deref(), Some("songstart"));
        assert_eq!(rx.recv().await.unwrap().command.as_deref(), Some("songfinish"));
    }

    #[tokio::test]
    async fn dispatch_without_subscribers_is_a_noop() {
        let hub = EventBroadcast::new();
        hub.dispatch(StateUpdate::default());
        assert_eq!(hub.receiver_count(), 0);
    }
}
