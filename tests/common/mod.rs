#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use chirpy::configuration::{
    ApplicationSettings, DatabaseSettings, JwtSettings, PolkaSettings, Settings,
};
use chirpy::startup::run;
use chirpy::store::{ChirpyStore, InMemoryStore};
use reqwest::Response;
use serde_json::{json, Value};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemoryStore>,
    pub client: reqwest::Client,
}

pub fn test_settings(platform: &str) -> Settings {
    Settings {
        database: DatabaseSettings {
            username: "postgres".to_string(),
            password: "password".to_string(),
            port: 5432,
            host: "localhost".to_string(),
            database_name: "unused".to_string(),
        },
        application: ApplicationSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            platform: platform.to_string(),
            static_dir: "./public".to_string(),
        },
        jwt: JwtSettings {
            secret: JWT_SECRET.to_string(),
            access_token_expiry: 3600,
            refresh_token_expiry: 60 * 24 * 60 * 60,
        },
        polka: PolkaSettings {
            api_key: POLKA_KEY.to_string(),
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_on("dev").await
}

pub async fn spawn_app_on(platform: &str) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(InMemoryStore::new());
    let shared: Arc<dyn ChirpyStore> = store.clone();
    let server = run(listener, shared, test_settings(platform)).expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        store,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_user(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/users"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/api/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sign up and log in; returns the login response body
    pub async fn signup_and_login(&self, email: &str, password: &str) -> Value {
        let response = self.post_user(email, password).await;
        assert_eq!(201, response.status().as_u16());

        let response = self.post_login(email, password).await;
        assert_eq!(200, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_refresh(&self, refresh_token: &str) -> Response {
        self.client
            .post(self.url("/api/refresh"))
            .header("Authorization", format!("Bearer {}", refresh_token))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_revoke(&self, refresh_token: &str) -> Response {
        self.client
            .post(self.url("/api/revoke"))
            .header("Authorization", format!("Bearer {}", refresh_token))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_chirp(&self, access_token: &str, body: &str) -> Response {
        self.client
            .post(self.url("/api/chirps"))
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&json!({ "body": body }))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}
