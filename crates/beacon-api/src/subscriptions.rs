use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use beacon_db::models::{SubscribeOutcome, UnsubscribeOutcome};
use beacon_types::api::{Claims, SubscribeRequest};
use beacon_types::models::SubscriptionRecord;

use crate::auth::AppState;
use crate::{analytics, blocking};

/// GET /subscriptions lists the caller's channels. Never fails for a user
/// without a record; they just have none.
pub async fn get_subscriptions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.db.clone();
    let user_id = claims.sub.clone();
    let record = blocking(move || db.get_subscription_record(&user_id)).await?;

    Ok(Json(record.unwrap_or(SubscriptionRecord {
        user_id: claims.sub,
        channels: Vec::new(),
    })))
}

pub async fn subscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubscribeRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let channel = req.channel.trim().to_string();
    if channel.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.db.clone();
    let user_id = claims.sub.clone();
    let name = channel.clone();
    let (outcome, channels) = blocking(move || {
        let outcome = db.subscribe(&user_id, &name)?;
        Ok((outcome, db.get_subscriptions(&user_id)?))
    })
    .await?;

    match outcome {
        SubscribeOutcome::Created => {
            analytics("first_channel_subscription", &claims.sub, Some(&channel), "subscribe")
        }
        SubscribeOutcome::Added => {
            analytics("channel_subscription", &claims.sub, Some(&channel), "subscribe")
        }
        SubscribeOutcome::AlreadySubscribed => {}
    }

    Ok(Json(SubscriptionRecord {
        user_id: claims.sub,
        channels,
    }))
}

pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let channel = channel.trim().to_string();
    if channel.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let db = state.db.clone();
    let user_id = claims.sub.clone();
    let name = channel.clone();
    let (outcome, channels) = blocking(move || {
        let outcome = db.unsubscribe(&user_id, &name)?;
        Ok((outcome, db.get_subscriptions(&user_id)?))
    })
    .await?;

    if outcome != UnsubscribeOutcome::NoRecord {
        analytics("channel_subscription", &claims.sub, Some(&channel), "unsubscribe");
    }

    Ok(Json(SubscriptionRecord {
        user_id: claims.sub,
        channels,
    }))
}
