//! Test utilities and fixtures for Recipe API integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

pub use recipe_api::config::AppEnv;
pub use recipe_api::db::{AppState, create_memory_pool, queries};
pub use recipe_api::identity::PasswordHasher;
pub use recipe_api::jwt::TokenService;
pub use recipe_api::models::*;
pub use recipe_api::rate_limit::{RateLimitConfig, RateLimitGate};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "masala123";

/// Default peer address for requests built by `ApiRequest`.
pub fn default_peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

pub fn test_state(env: AppEnv) -> AppState {
    test_state_with_limits(env, RateLimitConfig::default())
}

pub fn test_state_with_limits(env: AppEnv, limits: RateLimitConfig) -> AppState {
    AppState {
        db: create_memory_pool().expect("Failed to create in-memory pool"),
        env,
        trust_proxy: false,
        tokens: TokenService::new(TEST_SECRET, 24),
        hasher: PasswordHasher::fast(),
        rate_limiter: Arc::new(RateLimitGate::new(limits)),
    }
}

pub fn test_app(state: &AppState) -> Router {
    recipe_api::handlers::app(state.clone())
}

/// Builder for one request against the test app.
pub struct ApiRequest {
    method: &'static str,
    uri: String,
    token: Option<String>,
    body: Option<Value>,
    peer: SocketAddr,
    headers: Vec<(&'static str, String)>,
}

impl ApiRequest {
    pub fn new(method: &'static str, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            token: None,
            body: None,
            peer: default_peer(),
            headers: Vec::new(),
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    pub fn post(uri: impl Into<String>, body: Value) -> Self {
        Self::new("POST", uri).json(body)
    }

    pub fn put(uri: impl Into<String>, body: Value) -> Self {
        Self::new("PUT", uri).json(body)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new("DELETE", uri)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn peer(mut self, peer: SocketAddr) -> Self {
        self.peer = peer;
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(token) = self.token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let body = match self.body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(serde_json::to_vec(&value).unwrap())
            }
            None => Body::empty(),
        };
        let mut request = builder.body(body).unwrap();
        request.extensions_mut().insert(ConnectInfo(self.peer));
        request
    }

    /// Send and decode. Empty bodies decode as `Value::Null`.
    pub async fn send(self, app: &Router) -> (StatusCode, HeaderMap, Value) {
        let response = app.clone().oneshot(self.build()).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}

/// Register then log in. Returns (uid, token).
pub async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let (status, _, body) = ApiRequest::post(
        "/api/auth/register",
        json!({ "email": email, "password": PASSWORD }),
    )
    .send(app)
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

    let (status, _, body) = ApiRequest::post(
        "/api/auth/login",
        json!({ "email": email, "password": PASSWORD }),
    )
    .send(app)
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);

    (
        body["uid"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

pub fn make_admin(state: &AppState, uid: &str) {
    let conn = state.db.get().unwrap();
    assert!(queries::set_role(&conn, uid, Role::Admin).unwrap());
}

pub fn recipe_body() -> Value {
    json!({
        "title": "Chole Bhature",
        "description": "Spicy chickpea curry served with fried bread",
        "cookingTime": 50,
        "difficulty": "Medium",
        "cuisineType": "Punjabi"
    })
}

/// Create a recipe through the API. Returns its id.
pub async fn create_recipe(app: &Router, token: &str) -> String {
    let (status, _, body) = ApiRequest::post("/api/recipes", recipe_body())
        .token(token)
        .send(app)
        .await;
    assert_eq!(status, StatusCode::CREATED, "create recipe failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}
