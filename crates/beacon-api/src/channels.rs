use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use beacon_types::api::{Claims, CreateChannelRequest};

use crate::auth::AppState;
use crate::{analytics, blocking};

pub async fn list_channels(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let channels = blocking(move || db.list_channels()).await?;
    Ok(Json(channels))
}

pub async fn add_channel(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateChannelRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.db.clone();
    let channel = blocking(move || db.add_channel(&name)).await?;

    analytics("add_channel", &claims.sub, Some(&channel.name), "add");
    Ok((StatusCode::CREATED, Json(channel)))
}

/// Subscriptions naming the channel are left in place.
pub async fn remove_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let removed = blocking(move || {
        let Some(channel) = db.get_channel(&id)? else {
            return Ok(None);
        };
        Ok(db.remove_channel(&channel.id)?.then_some(channel))
    })
    .await?;

    let channel = removed.ok_or(StatusCode::NOT_FOUND)?;
    analytics("delete_channel", &claims.sub, Some(&channel.name), "delete");
    Ok(StatusCode::NO_CONTENT)
}
