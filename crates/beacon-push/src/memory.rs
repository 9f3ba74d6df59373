use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;

use crate::PushProvider;
use crate::error::RelayError;

/// In-process topic bindings. Stands in for a real network when no sender
/// key is configured, and in tests.
#[derive(Default)]
pub struct MemoryPushProvider {
    topics: Mutex<HashMap<String, BTreeSet<String>>>,
    failing: AtomicBool,
}

impl MemoryPushProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail as if the network rejected it.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Tokens currently bound to `topic`, sorted.
    pub fn tokens(&self, topic: &str) -> Vec<String> {
        self.topics
            .lock()
            .map(|topics| topics.get(topic).map(|t| t.iter().cloned().collect()).unwrap_or_default())
            .unwrap_or_default()
    }

    fn apply(&self, token: &str, topic: &str, bind: bool) -> Result<(), RelayError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RelayError::Rejected {
                status: 503,
                body: "memory push provider is set to fail".into(),
            });
        }

        let mut topics = self.topics.lock().map_err(|_| RelayError::Rejected {
            status: 500,
            body: "memory push provider lock poisoned".into(),
        })?;

        if bind {
            topics.entry(topic.to_string()).or_default().insert(token.to_string());
        } else if let Some(tokens) = topics.get_mut(topic) {
            tokens.remove(token);
            if tokens.is_empty() {
                topics.remove(topic);
            }
        }

        Ok(())
    }
}

impl PushProvider for MemoryPushProvider {
    fn subscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(async move { self.apply(token, topic, true) })
    }

    fn unsubscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(async move { self.apply(token, topic, false) })
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
