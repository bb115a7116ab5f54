//! Rate limiting tests.
//!
//! These tests verify that:
//! 1. The request reaching a tier's limit passes and the next one gets 429
//! 2. 429 bodies and headers carry the tier's message and retry hint
//! 3. Clients are counted separately, and so are tiers
//! 4. Test mode skips the auth and sensitive tiers unless the request opts in
//! 5. Proxy headers only decide client identity when trusted
//! 6. reset_all clears every counter

#[path = "../common/mod.rs"]
mod common;
use common::*;

use std::net::SocketAddr;

use axum::http::StatusCode;
use serde_json::{Value, json};

use recipe_api::rate_limit::Tier;

const OPT_IN: &str = "x-test-rate-limit";

fn ip(addr: &str) -> SocketAddr {
    addr.parse().unwrap()
}

fn registration(n: usize) -> Value {
    json!({ "email": format!("cook{}@example.com", n), "password": PASSWORD })
}

#[tokio::test]
async fn test_sixth_registration_from_one_client_is_limited() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);

    for n in 0..5 {
        let (status, _, body) = ApiRequest::post("/api/auth/register", registration(n))
            .header(OPT_IN, "true")
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::CREATED, "registration {} failed: {}", n, body);
    }

    let (status, headers, body) = ApiRequest::post("/api/auth/register", registration(5))
        .header(OPT_IN, "true")
        .send(&app)
        .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Too many requests"));
    assert_eq!(
        body,
        json!({
            "error": "Too many requests from this IP, please try again later.",
            "retryAfter": "15 minutes"
        })
    );
    assert!(headers.contains_key("retry-after"));
    assert_eq!(headers["ratelimit-limit"], "5");
    assert_eq!(headers["ratelimit-remaining"], "0");
}

#[tokio::test]
async fn test_test_mode_skips_auth_tier_without_opt_in() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);

    for n in 0..8 {
        let (status, _, _) = ApiRequest::post("/api/auth/register", registration(n))
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_development_mode_always_limits() {
    let state = test_state(AppEnv::Development);
    let app = test_app(&state);

    for n in 0..5 {
        let (status, _, _) = ApiRequest::post("/api/auth/register", registration(n))
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (status, _, _) = ApiRequest::post("/api/auth/register", registration(5))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_clients_are_counted_separately() {
    let state = test_state(AppEnv::Development);
    let app = test_app(&state);

    for n in 0..5 {
        ApiRequest::post("/api/auth/register", registration(n))
            .peer(ip("10.0.0.1:5000"))
            .send(&app)
            .await;
    }
    let (status, _, _) = ApiRequest::post("/api/auth/register", registration(5))
        .peer(ip("10.0.0.1:5000"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _, _) = ApiRequest::post("/api/auth/register", registration(6))
        .peer(ip("10.0.0.2:5000"))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_exhausted_auth_tier_leaves_reads_alone() {
    let state = test_state(AppEnv::Development);
    let app = test_app(&state);

    for n in 0..6 {
        ApiRequest::post("/api/auth/register", registration(n))
            .send(&app)
            .await;
    }

    let (status, headers, _) = ApiRequest::get("/api/recipes").send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["ratelimit-limit"], "100");
}

#[tokio::test]
async fn test_sensitive_tier_limits_writes() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "busy@example.com").await;

    for n in 0..10 {
        let (status, headers, _) = ApiRequest::post("/api/recipes", recipe_body())
            .token(&token)
            .header(OPT_IN, "true")
            .send(&app)
            .await;
        assert_eq!(status, StatusCode::CREATED, "write {} should pass", n);
        assert_eq!(headers["ratelimit-limit"], "10");
    }

    let (status, _, body) = ApiRequest::post("/api/recipes", recipe_body())
        .token(&token)
        .header(OPT_IN, "true")
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Too many requests from this IP on sensitive endpoints, please try again later."
    );
}

#[tokio::test]
async fn test_rate_limit_runs_before_authentication() {
    let limits = RateLimitConfig::default().with_max(Tier::Sensitive, Some(1));
    let state = test_state_with_limits(AppEnv::Development, limits);
    let app = test_app(&state);

    let (status, _, _) = ApiRequest::post("/api/recipes", recipe_body()).send(&app).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The unauthenticated attempt used up the window
    let (status, _, _) = ApiRequest::post("/api/recipes", recipe_body()).send(&app).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn test_api_tier_is_not_bypassed_in_test_mode() {
    let limits = RateLimitConfig::default().with_max(Tier::Api, Some(3));
    let state = test_state_with_limits(AppEnv::Test, limits);
    let app = test_app(&state);

    for _ in 0..3 {
        let (status, _, _) = ApiRequest::get("/api/recipes").send(&app).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _, body) = ApiRequest::get("/api/recipes").send(&app).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["retryAfter"], "1 hour");

    // Public routes are outside /api
    let (status, _, _) = ApiRequest::get("/health").send(&app).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_forwarded_for_ignored_unless_trusted() {
    let limits = RateLimitConfig::default().with_max(Tier::Api, Some(1));

    let state = test_state_with_limits(AppEnv::Test, limits);
    let app = test_app(&state);
    ApiRequest::get("/api/recipes")
        .header("x-forwarded-for", "203.0.113.1")
        .send(&app)
        .await;
    let (status, _, _) = ApiRequest::get("/api/recipes")
        .header("x-forwarded-for", "203.0.113.2")
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let mut state = test_state_with_limits(AppEnv::Test, limits);
    state.trust_proxy = true;
    let app = test_app(&state);
    ApiRequest::get("/api/recipes")
        .header("x-forwarded-for", "203.0.113.1")
        .send(&app)
        .await;
    let (status, _, _) = ApiRequest::get("/api/recipes")
        .header("x-forwarded-for", "203.0.113.2")
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reset_all_readmits_clients() {
    let state = test_state(AppEnv::Development);
    let app = test_app(&state);

    for n in 0..6 {
        ApiRequest::post("/api/auth/register", registration(n))
            .send(&app)
            .await;
    }
    let (status, _, _) = ApiRequest::post("/api/auth/register", registration(6))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    state.rate_limiter.reset_all().await;

    let (status, _, _) = ApiRequest::post("/api/auth/register", registration(6))
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CREATED);
}
