//! Per-channel message streams: append with [`ChatSession::send`], follow
//! with [`ChatSession::subscribe`].

use std::collections::VecDeque;
use std::sync::Arc;

use anyhow::Result;
use futures_util::stream::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use beacon_db::Database;
use beacon_types::models::{Identity, Message};

use crate::dispatcher::Dispatcher;

#[derive(Clone)]
pub struct ChatSession {
    db: Arc<Database>,
    dispatcher: Dispatcher,
}

impl ChatSession {
    pub fn new(db: Arc<Database>, dispatcher: Dispatcher) -> Self {
        Self { db, dispatcher }
    }

    /// Append a message to `channel` and publish it to live subscribers.
    /// Without a client timestamp the server clock is used.
    pub async fn send(
        &self,
        sender: &Identity,
        channel: &str,
        text: &str,
        timestamp: Option<i64>,
    ) -> Result<Message> {
        let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

        // Run blocking DB insert off the async runtime
        let db = self.db.clone();
        let channel = channel.to_string();
        let sender_id = sender.user_id.clone();
        let text = text.to_string();
        let message = tokio::task::spawn_blocking(move || {
            db.insert_message(&channel, &sender_id, &text, timestamp)
        })
        .await??;

        self.dispatcher.broadcast(message.clone());
        Ok(message)
    }

    pub async fn history(&self, channel: &str) -> Result<Vec<Message>> {
        let db = self.db.clone();
        let channel = channel.to_string();
        tokio::task::spawn_blocking(move || db.get_messages(&channel)).await?
    }

    /// Follow `channel`: existing history first, then live appends.
    pub async fn subscribe(&self, channel: &str) -> Result<ChatSubscription> {
        // Listen before reading history so nothing stored in between is missed.
        let live = self.dispatcher.subscribe();
        let backlog = self.history(channel).await?;
        let watermark = backlog.last().map(|m| m.seq).unwrap_or(0);

        debug!(
            "Chat subscription on {} ({} messages of history)",
            channel,
            backlog.len()
        );

        Ok(ChatSubscription {
            db: self.db.clone(),
            channel: channel.to_string(),
            backlog: backlog.into(),
            watermark,
            delivered: watermark,
            live,
            cancel: CancellationToken::new(),
        })
    }
}

/// Live view of one channel. Ends for good once cancelled or dropped.
pub struct ChatSubscription {
    db: Arc<Database>,
    channel: String,
    backlog: VecDeque<Message>,
    /// Highest `seq` read from the store; live copies at or below it are duplicates.
    watermark: i64,
    /// Highest `seq` handed to the caller.
    delivered: i64,
    live: broadcast::Receiver<Message>,
    cancel: CancellationToken,
}

impl ChatSubscription {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Next message, or `None` once the subscription has ended.
    pub async fn next(&mut self) -> Option<Message> {
        if self.cancel.is_cancelled() {
            return None;
        }

        loop {
            if let Some(message) = self.backlog.pop_front() {
                self.delivered = self.delivered.max(message.seq);
                return Some(message);
            }

            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return None,
                result = self.live.recv() => result,
            };

            match result {
                Ok(message) => {
                    if message.channel == self.channel && message.seq > self.watermark {
                        self.delivered = self.delivered.max(message.seq);
                        return Some(message);
                    }
                }
                Err(RecvError::Lagged(n)) => {
                    warn!("Chat subscription on {} lagged by {} messages", self.channel, n);
                    // Skipped messages are already stored; reload ours from there.
                    if let Err(e) = self.catch_up().await {
                        error!("Chat subscription on {} failed to catch up: {}", self.channel, e);
                    }
                }
                Err(RecvError::Closed) => {
                    self.cancel.cancel();
                    return None;
                }
            }
        }
    }

    async fn catch_up(&mut self) -> Result<()> {
        let db = self.db.clone();
        let channel = self.channel.clone();
        let after = self.delivered;
        let missed =
            tokio::task::spawn_blocking(move || db.get_messages_after(&channel, after)).await??;

        if let Some(last) = missed.last() {
            self.watermark = self.watermark.max(last.seq);
        }
        debug!(
            "Chat subscription on {} recovered {} messages",
            self.channel,
            missed.len()
        );
        self.backlog.extend(missed);
        Ok(())
    }

    /// Stop delivery. Any pending or later `next()` returns `None`.
    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Handle that cancels this subscription from another task.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn into_stream(self) -> impl Stream<Item = Message> + Send {
        async_stream::stream! {
            let mut subscription = self;
            while let Some(message) = subscription.next().await {
                yield message;
            }
        }
    }
}

impl Drop for ChatSubscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
