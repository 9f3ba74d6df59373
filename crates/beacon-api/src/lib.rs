pub mod auth;
pub mod channels;
pub mod messages;
pub mod middleware;
pub mod relay;
pub mod routes;
pub mod subscriptions;

use axum::http::StatusCode;
use tracing::{error, info};

/// Run a blocking store call off the async runtime, logging failures.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, StatusCode>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Store call failed: {:#}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Product analytics, routed by the `analytics` log target.
pub(crate) fn analytics(event: &str, user_id: &str, channel: Option<&str>, action: &str) {
    info!(
        target: "analytics",
        event,
        user_id,
        channel = channel.unwrap_or_default(),
        action,
        "analytics event"
    );
}
