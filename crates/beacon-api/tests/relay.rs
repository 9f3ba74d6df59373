mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{call, test_app, text, token};

#[tokio::test]
async fn subscribe_topic_relays_to_provider() {
    let t = test_app(true);
    let u = token("u1");

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/subscribe",
        Some(&u),
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "Subscribed to topic: news");
    assert_eq!(t.push.tokens("news"), vec!["t1"]);

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/unsubscribe",
        Some(&u),
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "Unsubscribed from topic: news");
    assert!(t.push.tokens("news").is_empty());
}

#[tokio::test]
async fn provider_failure_is_a_500() {
    let t = test_app(true);
    t.push.set_failing(true);

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/subscribe",
        Some(&token("u1")),
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(&body), "Failed to subscribe to topic.");

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/unsubscribe",
        Some(&token("u1")),
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text(&body), "Failed to unsubscribe from topic.");
}

#[tokio::test]
async fn bad_relay_input_is_rejected() {
    let t = test_app(true);
    let u = token("u1");

    let (status, _) = call(&t.app, Method::POST, "/subscribe", Some(&u), Some(json!({ "channel": "news" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &t.app,
        Method::POST,
        "/subscribe",
        Some(&u),
        Some(json!({ "token": "t1", "channel": "two words" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(t.push.tokens("two words").is_empty());
}

#[tokio::test]
async fn relay_auth_follows_configuration() {
    let secured = test_app(true);
    let (status, _) = call(
        &secured.app,
        Method::POST,
        "/subscribe",
        None,
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let open = test_app(false);
    let (status, _) = call(
        &open.app,
        Method::POST,
        "/subscribe",
        None,
        Some(json!({ "token": "t1", "channel": "news" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn save_fcm_token_persists() {
    let t = test_app(true);
    let u = token("u1");

    let (status, _) = call(&t.app, Method::POST, "/save-fcm-token", Some(&u), Some(json!({ "userId": "u1" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(
        &t.app,
        Method::POST,
        "/save-fcm-token",
        Some(&u),
        Some(json!({ "userId": "u1", "fcmToken": "device-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text(&body), "FCM token saved.");
    let stored: String = t
        .state
        .db
        .with_conn(|conn| {
            Ok(conn.query_row("SELECT token FROM fcm_tokens WHERE user_id = ?1", ["u1"], |r| r.get(0))?)
        })
        .unwrap();
    assert_eq!(stored, "device-1");
}
