//! Device-token endpoints: topic subscribe/unsubscribe and token storage.

use axum::{Json, extract::State, http::StatusCode};

use beacon_types::api::{SaveFcmTokenRequest, TopicRequest};

use crate::auth::AppState;
use crate::blocking;

fn required(field: Option<String>) -> Option<String> {
    field
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /subscribe
pub async fn subscribe_topic(
    State(state): State<AppState>,
    Json(req): Json<TopicRequest>,
) -> (StatusCode, String) {
    let (Some(token), Some(topic)) = (required(req.token), required(req.channel)) else {
        return (StatusCode::BAD_REQUEST, "Missing token or channel.".into());
    };

    match state.relay.subscribe_topic(&token, &topic).await {
        Ok(()) => (StatusCode::OK, format!("Subscribed to topic: {}", topic)),
        Err(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to subscribe to topic.".into(),
        ),
    }
}

/// POST /unsubscribe
pub async fn unsubscribe_topic(
    State(state): State<AppState>,
    Json(req): Json<TopicRequest>,
) -> (StatusCode, String) {
    let (Some(token), Some(topic)) = (required(req.token), required(req.channel)) else {
        return (StatusCode::BAD_REQUEST, "Missing token or channel.".into());
    };

    match state.relay.unsubscribe_topic(&token, &topic).await {
        Ok(()) => (StatusCode::OK, format!("Unsubscribed from topic: {}", topic)),
        Err(e) if e.is_validation() => (StatusCode::BAD_REQUEST, e.to_string()),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to unsubscribe from topic.".into(),
        ),
    }
}

/// POST /save-fcm-token
pub async fn save_fcm_token(
    State(state): State<AppState>,
    Json(req): Json<SaveFcmTokenRequest>,
) -> (StatusCode, String) {
    let (Some(user_id), Some(token)) = (required(req.user_id), required(req.fcm_token)) else {
        return (StatusCode::BAD_REQUEST, "Missing userId or fcmToken.".into());
    };

    let db = state.db.clone();
    match blocking(move || db.save_fcm_token(&user_id, &token)).await {
        Ok(()) => (StatusCode::OK, "FCM token saved.".into()),
        Err(status) => (status, "Failed to save FCM token.".into()),
    }
}
