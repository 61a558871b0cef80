#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use http_body_util::BodyExt;
use sbx_api::{config::Environment, state::ApiState};
use serde::Deserialize;
use tower::ServiceExt;

/// Test state builder backed by a fresh in-memory database
pub struct TestStateBuilder {
    environment: Environment,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            environment: Environment::Development,
        }
    }

    /// Build an `ApiState` whose database is migrated and empty
    pub async fn build(self) -> anyhow::Result<ApiState> {
        let pool = sbx_db::create_memory_pool().await?;
        sbx_db::migrate(&pool).await?;

        Ok(ApiState {
            pool,
            environment: self.environment,
        })
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Router over a fresh database, plus the state for direct seeding
    pub async fn with_fresh_state() -> (Self, ApiState) {
        let state = TestStateBuilder::new()
            .build()
            .await
            .expect("Failed to create test state");
        let app = sbx_api::router::router().with_state(state.clone());

        (Self::new(app), state)
    }

    /// Send a request and get the response
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a DELETE request
    pub async fn delete(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("DELETE")
            .uri(uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }

    /// The `error` message of a JSON error body
    pub fn error_message(&self) -> String {
        let json: serde_json::Value = self.json();
        json["error"]
            .as_str()
            .expect("Error body should carry an error message")
            .to_string()
    }
}

/// Seed helpers that bypass the HTTP layer
pub mod seed {
    use sbx_db::{
        models::{Category, Suggestion, Topic},
        repositories::{category, suggestion, topic},
    };
    use sqlx::SqlitePool;

    pub async fn topic(pool: &SqlitePool, name: &str) -> Topic {
        topic::insert(pool, name, &format!("{name} description"))
            .await
            .expect("Failed to seed topic")
    }

    pub async fn category(pool: &SqlitePool, name: &str, topic_id: i64) -> Category {
        category::insert(pool, name, topic_id)
            .await
            .expect("Failed to seed category")
    }

    pub async fn suggestion(pool: &SqlitePool, name: &str, content: &str, category_id: i64) -> Suggestion {
        suggestion::insert(pool, name, content, category_id)
            .await
            .expect("Failed to seed suggestion")
    }
}
