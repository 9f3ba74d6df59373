use std::sync::Arc;

use axum::{Extension, Json, response::IntoResponse};

use beacon_db::Database;
use beacon_gateway::chat::ChatSession;
use beacon_push::TopicRelay;
use beacon_types::api::{AuthErrorResponse, Claims, MeResponse, ResolveAuthErrorRequest};
use beacon_types::auth::{AuthErrorKind, SignInMethod};

use crate::analytics;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub chat: ChatSession,
    pub relay: TopicRelay,
    /// Secret the auth provider signs identity tokens with.
    pub jwt_secret: String,
    pub relay_requires_auth: bool,
}

/// GET /auth/me returns the identity carried by the caller's token.
pub async fn me(Extension(claims): Extension<Claims>) -> impl IntoResponse {
    let method = SignInMethod::from_provider_id(claims.sign_in_provider.as_deref());

    if claims.is_first_sign_in() {
        analytics("first_time_login", &claims.sub, None, method.as_str());
    }

    Json(MeResponse {
        identity: claims.identity(),
        sign_in_provider: claims.sign_in_provider.clone(),
    })
}

/// POST /auth/errors turns a provider error code into a stable kind and
/// a message fit for display.
pub async fn resolve_error(Json(req): Json<ResolveAuthErrorRequest>) -> impl IntoResponse {
    Json(AuthErrorResponse::from(AuthErrorKind::from_provider_code(&req.code)))
}
