use axum::{
    Extension, Json,
    extract::{Path, State, WebSocketUpgrade},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;

use beacon_gateway::connection;
use beacon_types::api::{Claims, SendMessageRequest};

use crate::auth::AppState;

/// Any authenticated user may read or post in any channel; subscribing only
/// controls what the client lists and which topics it is notified on.
pub async fn send_message(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if req.text.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let message = state
        .chat
        .send(&claims.identity(), &channel, &req.text, req.timestamp)
        .await
        .map_err(|e| {
            error!("Failed to send message to {}: {:#}", channel, e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_messages(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let messages = state.chat.history(&channel).await.map_err(|e| {
        error!("Failed to load history for {}: {:#}", channel, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(messages))
}

/// GET /messages/{channel}/stream upgrades to a WebSocket feed of history then live messages.
pub async fn stream_messages(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Extension(claims): Extension<Claims>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let session = state.chat.clone();
    let identity = claims.identity();
    ws.on_upgrade(move |socket| connection::stream_channel(socket, session, identity, channel))
}
