use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use beacon_types::api::{AuthErrorResponse, Claims};
use beacon_types::auth::AuthErrorKind;

use crate::auth::AppState;

/// Extract and validate the identity token from the Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized(AuthErrorKind::InvalidSession))?;

    let claims = decode_claims(token, &state.jwt_secret).map_err(|e| {
        debug!("Rejected identity token: {}", e);
        unauthorized(AuthErrorKind::InvalidSession)
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn decode_claims(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

fn unauthorized(kind: AuthErrorKind) -> Response {
    (StatusCode::UNAUTHORIZED, Json(AuthErrorResponse::from(kind))).into_response()
}
