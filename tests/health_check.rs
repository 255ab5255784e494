//! Health, static files and admin endpoints

mod common;

use common::{spawn_app, spawn_app_on};

#[tokio::test]
async fn healthz_returns_ok() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/plain"));
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn file_server_hits_are_counted() {
    let app = spawn_app().await;

    for _ in 0..3 {
        let response = app
            .client
            .get(app.url("/app/"))
            .send()
            .await
            .expect("Failed to execute request");
        assert!(response.status().is_success());
    }

    // API traffic is not counted
    app.client
        .get(app.url("/api/healthz"))
        .send()
        .await
        .expect("Failed to execute request");

    let page = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();

    assert!(page.contains("Chirpy has been visited 3 times!"), "{}", page);
}

#[tokio::test]
async fn reset_clears_hits_and_users_on_dev() {
    let app = spawn_app().await;

    app.post_user("a@b.com", "x").await;
    app.client.get(app.url("/app/")).send().await.unwrap();

    let response = app
        .client
        .post(app.url("/admin/reset"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.text().await.unwrap(), "Hits reset to: 0");

    // the user is gone, so the same email can sign up again
    assert_eq!(201, app.post_user("a@b.com", "x").await.status().as_u16());
}

#[tokio::test]
async fn reset_is_forbidden_outside_dev() {
    let app = spawn_app_on("production").await;

    app.client.get(app.url("/app/")).send().await.unwrap();

    let response = app
        .client
        .post(app.url("/admin/reset"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(403, response.status().as_u16());

    let page = app
        .client
        .get(app.url("/admin/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("visited 1 times"));
}
