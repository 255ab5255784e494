//! Payment provider webhook

mod common;

use chirpy::store::ChirpyStore;
use common::{spawn_app, POLKA_KEY};
use serde_json::{json, Value};
use uuid::Uuid;

async fn post_webhook(app: &common::TestApp, auth: Option<&str>, body: Value) -> u16 {
    let mut request = app.client.post(app.url("/api/polka/webhooks")).json(&body);
    if let Some(value) = auth {
        request = request.header("Authorization", value);
    }
    request
        .send()
        .await
        .expect("Failed to execute request.")
        .status()
        .as_u16()
}

#[tokio::test]
async fn upgrade_event_marks_user_red() {
    let app = spawn_app().await;
    let user: Value = app.post_user("a@b.com", "x").await.json().await.unwrap();

    let status = post_webhook(
        &app,
        Some(&format!("ApiKey {}", POLKA_KEY)),
        json!({"event": "user.upgraded", "data": {"user_id": user["id"]}}),
    )
    .await;
    assert_eq!(204, status);

    let stored = app.store.get_user_by_email("a@b.com").await.unwrap().unwrap();
    assert!(stored.is_chirpy_red);

    let session: Value = app.post_login("a@b.com", "x").await.json().await.unwrap();
    assert_eq!(session["is_chirpy_red"], true);
}

#[tokio::test]
async fn unknown_event_is_ignored() {
    let app = spawn_app().await;
    let user: Value = app.post_user("a@b.com", "x").await.json().await.unwrap();

    let status = post_webhook(
        &app,
        Some(&format!("ApiKey {}", POLKA_KEY)),
        json!({"event": "user.payment_failed", "data": {"user_id": user["id"]}}),
    )
    .await;
    assert_eq!(204, status);

    let stored = app.store.get_user_by_email("a@b.com").await.unwrap().unwrap();
    assert!(!stored.is_chirpy_red);
}

#[tokio::test]
async fn webhook_requires_valid_api_key() {
    let app = spawn_app().await;
    let user: Value = app.post_user("a@b.com", "x").await.json().await.unwrap();
    let body = json!({"event": "user.upgraded", "data": {"user_id": user["id"]}});

    let bearer = format!("Bearer {}", POLKA_KEY);

    for auth in [None, Some("ApiKey wrong-key"), Some(bearer.as_str())] {
        assert_eq!(401, post_webhook(&app, auth, body.clone()).await, "auth: {:?}", auth);
    }

    let stored = app.store.get_user_by_email("a@b.com").await.unwrap().unwrap();
    assert!(!stored.is_chirpy_red);
}

#[tokio::test]
async fn upgrade_of_unknown_user_returns_404() {
    let app = spawn_app().await;

    let status = post_webhook(
        &app,
        Some(&format!("ApiKey {}", POLKA_KEY)),
        json!({"event": "user.upgraded", "data": {"user_id": Uuid::new_v4()}}),
    )
    .await;

    assert_eq!(404, status);
}

#[tokio::test]
async fn api_key_is_checked_before_the_body() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(401, response.status().as_u16());

    let response = app
        .client
        .post(app.url("/api/polka/webhooks"))
        .header("Authorization", format!("ApiKey {}", POLKA_KEY))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(400, response.status().as_u16());
    let error: Value = response.json().await.unwrap();
    assert!(error["message"].is_string());
}
