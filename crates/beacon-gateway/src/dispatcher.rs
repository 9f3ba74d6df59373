use std::sync::Arc;

use tokio::sync::broadcast;

use beacon_types::models::Message;

/// Capacity of the fan-out buffer. Receivers further behind than this lag.
const BROADCAST_CAPACITY: usize = 1024;

/// Fans newly stored messages out to every live chat subscription.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

struct DispatcherInner {
    /// All channels share one bus; subscriptions filter by channel name.
    broadcast_tx: broadcast::Sender<Message>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            inner: Arc::new(DispatcherInner { broadcast_tx }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.inner.broadcast_tx.subscribe()
    }

    /// Publish a stored message. Having no listeners is not an error.
    pub fn broadcast(&self, message: Message) {
        let _ = self.inner.broadcast_tx.send(message);
    }

    pub fn listener_count(&self) -> usize {
        self.inner.broadcast_tx.receiver_count()
    }
}
