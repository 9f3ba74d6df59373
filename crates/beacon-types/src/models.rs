use serde::{Deserialize, Serialize};

/// A named chat room. Names are human-chosen and not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

/// One entry in a channel's append-only stream.
///
/// `seq` is assigned by the store and is the only ordering the system
/// guarantees; `timestamp` (ms since epoch) may come from a client clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub seq: i64,
    pub channel: String,
    pub sender: String,
    pub text: String,
    pub timestamp: i64,
}

/// Per-user set of subscribed channel names, in subscription order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub user_id: String,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Contact {
    Email(String),
    Phone(String),
}

/// The caller as issued by the auth provider. Passed explicitly to every
/// registry, directory and chat operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub contact: Option<Contact>,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            contact: None,
        }
    }

    /// Email wins when the provider reports both.
    pub fn with_contact(mut self, email: Option<String>, phone: Option<String>) -> Self {
        self.contact = match (email, phone) {
            (Some(email), _) => Some(Contact::Email(email)),
            (None, Some(phone)) => Some(Contact::Phone(phone)),
            (None, None) => None,
        };
        self
    }
}
