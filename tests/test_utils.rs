#![allow(dead_code)]

use std::{net::TcpListener, time::Duration};

use actix_web::web;
use portfolio_site::{
    settings::{AppConfig, AppEnvironment},
    shared_repos::SharedRepositories,
    startup,
    AppState,
};
use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

pub struct TestApp {
    pub state: web::Data<AppState>,
    pub address: String,
    pub client: Client,
    pub config: AppConfig,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Starts the real server on an ephemeral port backed by in-memory
    /// storage.
    pub async fn spawn_with(config: AppConfig) -> Self {
        let state = web::Data::new(AppState::new(&config, SharedRepositories::in_memory()));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let server = startup::run(listener, &config, state.clone()).expect("Failed to bind server");
        tokio::spawn(server);

        let client = Client::new();
        while client.get(format!("{}/api/health", address)).send().await.is_err() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            state,
            address,
            client,
            config,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn admin_token(&self) -> String {
        self.state
            .jwt_service
            .issue_token("admin-1", "admin@example.com", true, chrono::Duration::minutes(10))
            .unwrap()
    }

    pub fn visitor_token(&self) -> String {
        self.state
            .jwt_service
            .issue_token("visitor-1", "visitor@example.com", false, chrono::Duration::minutes(10))
            .unwrap()
    }

    pub async fn create_project(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/projects"))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .expect("Failed to create project")
    }

    pub async fn create_post(&self, body: Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/blog"))
            .bearer_auth(self.admin_token())
            .json(&body)
            .send()
            .await
            .expect("Failed to create blog post")
    }

    /// Creates a post and returns its `data` object.
    pub async fn created_post(&self, body: Value) -> Value {
        let response = self.create_post(body).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["data"].clone()
    }

    pub async fn get_json(&self, path: &str) -> (reqwest::StatusCode, Value) {
        let response = self.client.get(self.url(path)).send().await.unwrap();
        let status = response.status();
        (status, response.json().await.unwrap())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        env: AppEnvironment::Testing,
        name: "Portfolio Site Test".to_string(),
        owner_name: "Test Owner".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        worker_count: 1,
        seed_mock_data: false,
        jwt_secret: "test_jwt_secret_that_is_long_enough_for_hs512_1234567890".into(),
        chat_api_url: None,
        chat_timeout_secs: 2,
        chat_rate_limit_per_minute: 100,
        upload_dir: std::env::temp_dir()
            .join(format!("portfolio-uploads-{}", Uuid::new_v4()))
            .display()
            .to_string(),
        upload_max_bytes: 64 * 1024,
        ..AppConfig::default()
    }
}
