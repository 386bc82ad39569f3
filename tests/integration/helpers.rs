//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use tutorlink_api::{AppState, build_app};
use tutorlink_core::config::AppConfig;
use tutorlink_database::MemoryUserDirectory;

/// Test application context over an in-memory directory
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for inspecting the realtime engine
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application
    pub fn new() -> Self {
        let state = AppState::new(
            AppConfig::default(),
            Arc::new(MemoryUserDirectory::new()),
            None,
        );
        Self {
            router: build_app(state.clone()),
            state,
        }
    }

    /// Register a user through the API
    pub async fn register(&self, username: &str, password: &str, role: &str, grade: i32) -> TestResponse {
        self.request(
            "POST",
            "/api/auth/register",
            Some(json!({
                "username": username,
                "password": password,
                "role": role,
                "grade": grade,
            })),
            None,
        )
        .await
    }

    /// Log in and return the token
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "username": username, "password": password })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.body["token"]
            .as_str()
            .expect("token missing")
            .to_string()
    }

    /// Register, log in, and return the new user's id
    pub async fn create_user(&self, username: &str, role: &str, grade: i32) -> Uuid {
        let response = self.register(username, "pw", role, grade).await;
        assert_eq!(response.status, StatusCode::CREATED, "register failed: {}", response.body);

        let token = self.login(username, "pw").await;
        let me = self.request("GET", "/api/auth/me", None, Some(&token)).await;
        me.body["id"]
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .expect("id missing")
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Serve the app on an ephemeral port for WebSocket clients
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr");
        let router = self.router.clone();

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        addr
    }

    /// Poll until `check` holds or five seconds pass
    pub async fn wait_until<F, Fut>(&self, mut check: F)
    where
        F: FnMut(AppState) -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !check(self.state.clone()).await {
            assert!(tokio::time::Instant::now() < deadline, "condition not reached");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// Status code
    pub status: StatusCode,
    /// JSON body, or `Null`
    pub body: Value,
}
