use std::sync::Arc;

use tracing::{error, info};

use crate::PushProvider;
use crate::error::RelayError;
use crate::topic::{validate_token, validate_topic};

/// Stateless bridge from a (device token, channel name) pair to the push
/// provider. Failures are logged and returned, never swallowed.
#[derive(Clone)]
pub struct TopicRelay {
    provider: Arc<dyn PushProvider>,
}

impl TopicRelay {
    pub fn new(provider: Arc<dyn PushProvider>) -> Self {
        Self { provider }
    }

    pub async fn subscribe_topic(&self, token: &str, topic: &str) -> Result<(), RelayError> {
        let token = validate_token(token)?;
        let topic = validate_topic(topic)?;

        match self.provider.subscribe(token, topic).await {
            Ok(()) => {
                info!("Subscribed device to topic {} via {}", topic, self.provider.name());
                Ok(())
            }
            Err(e) => {
                error!("Error subscribing to topic {}: {}", topic, e);
                Err(e)
            }
        }
    }

    pub async fn unsubscribe_topic(&self, token: &str, topic: &str) -> Result<(), RelayError> {
        let token = validate_token(token)?;
        let topic = validate_topic(topic)?;

        match self.provider.unsubscribe(token, topic).await {
            Ok(()) => {
                info!("Unsubscribed device from topic {} via {}", topic, self.provider.name());
                Ok(())
            }
            Err(e) => {
                error!("Error unsubscribing from topic {}: {}", topic, e);
                Err(e)
            }
        }
    }
}
