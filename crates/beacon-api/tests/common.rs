#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use beacon_api::auth::{AppState, AppStateInner};
use beacon_api::routes::router;
use beacon_db::Database;
use beacon_gateway::chat::ChatSession;
use beacon_gateway::dispatcher::Dispatcher;
use beacon_push::{MemoryPushProvider, TopicRelay};
use beacon_types::api::Claims;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub push: Arc<MemoryPushProvider>,
}

pub fn test_app(relay_requires_auth: bool) -> TestApp {
    let db = Arc::new(Database::open_in_memory().unwrap());
    let push = Arc::new(MemoryPushProvider::new());
    let state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        chat: ChatSession::new(db, Dispatcher::new()),
        relay: TopicRelay::new(push.clone()),
        jwt_secret: SECRET.to_string(),
        relay_requires_auth,
    });

    TestApp {
        app: router(state.clone()),
        state,
        push,
    }
}

pub fn claims(sub: &str) -> Claims {
    let now = chrono::Utc::now().timestamp();
    Claims {
        sub: sub.to_string(),
        email: Some(format!("{}@example.com", sub)),
        phone_number: None,
        sign_in_provider: Some("password".to_string()),
        auth_time: now,
        created_at: Some(now - 86_400),
        exp: (now + 3600) as usize,
    }
}

pub fn sign(claims: &Claims) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

pub fn token(sub: &str) -> String {
    sign(&claims(sub))
}

pub async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", bearer));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

pub fn json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

pub fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}
