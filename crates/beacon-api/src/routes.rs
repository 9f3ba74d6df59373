use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{channels, messages, relay, subscriptions};

/// Every HTTP route. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/errors", post(auth::resolve_error));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/channels", get(channels::list_channels).post(channels::add_channel))
        .route("/channels/{id}", delete(channels::remove_channel))
        .route(
            "/subscriptions",
            get(subscriptions::get_subscriptions).post(subscriptions::subscribe),
        )
        .route("/subscriptions/{channel}", delete(subscriptions::unsubscribe))
        .route(
            "/messages/{channel}",
            get(messages::get_messages).post(messages::send_message),
        )
        .route("/messages/{channel}/stream", get(messages::stream_messages))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut relay_routes = Router::new()
        .route("/subscribe", post(relay::subscribe_topic))
        .route("/unsubscribe", post(relay::unsubscribe_topic))
        .route("/save-fcm-token", post(relay::save_fcm_token));
    if state.relay_requires_auth {
        relay_routes = relay_routes.layer(middleware::from_fn_with_state(state.clone(), require_auth));
    }

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(relay_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
