//! Push-delivery network seam: device tokens bound to named topics.
//!
//! The network owns the token ↔ topic bindings. Nothing here keeps a copy;
//! [`relay::TopicRelay`] validates and forwards, and a [`PushProvider`]
//! talks to whichever network is configured.

pub mod error;
pub mod fcm;
pub mod memory;
pub mod relay;
pub mod topic;

use futures_util::future::BoxFuture;

pub use error::RelayError;
pub use fcm::FcmTopicClient;
pub use memory::MemoryPushProvider;
pub use relay::TopicRelay;

pub trait PushProvider: Send + Sync {
    /// Bind `token` to `topic`.
    fn subscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>>;

    /// Remove the binding of `token` to `topic`.
    fn unsubscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}
