use futures_util::future::BoxFuture;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PushProvider;
use crate::error::RelayError;

pub const DEFAULT_ENDPOINT: &str = "https://iid.googleapis.com";

/// Topic management through the FCM instance-id API, authenticated with
/// the project's server key.
#[derive(Clone)]
pub struct FcmTopicClient {
    http: reqwest::Client,
    endpoint: String,
    server_key: String,
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    to: String,
    registration_tokens: [&'a str; 1],
}

#[derive(Debug, Default, Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<BatchResult>,
}

#[derive(Debug, Deserialize)]
struct BatchResult {
    error: Option<String>,
}

impl FcmTopicClient {
    pub fn new(server_key: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, server_key)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, server_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            server_key: server_key.into(),
        }
    }

    async fn batch(&self, action: &str, token: &str, topic: &str) -> Result<(), RelayError> {
        let url = format!("{}/iid/v1:{}", self.endpoint, action);
        debug!("FCM {} topic={}", action, topic);

        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("key={}", self.server_key))
            .json(&BatchRequest {
                to: format!("/topics/{}", topic),
                registration_tokens: [token],
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: BatchResponse = resp.json().await?;
        let errors: Vec<String> = parsed.results.into_iter().filter_map(|r| r.error).collect();
        if !errors.is_empty() {
            return Err(RelayError::TokenErrors(errors));
        }

        Ok(())
    }
}

impl PushProvider for FcmTopicClient {
    fn subscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(self.batch("batchAdd", token, topic))
    }

    fn unsubscribe<'a>(&'a self, token: &'a str, topic: &'a str) -> BoxFuture<'a, Result<(), RelayError>> {
        Box::pin(self.batch("batchRemove", token, topic))
    }

    fn name(&self) -> &'static str {
        "fcm"
    }
}
