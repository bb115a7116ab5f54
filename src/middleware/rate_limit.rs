use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::AppEnv;
use crate::db::AppState;
use crate::error::AppError;
use crate::rate_limit::{Decision, Tier};
use crate::util::client_identity;

/// Requests carrying this header are rate limited even in test mode.
pub const TEST_RATE_LIMIT_HEADER: &str = "x-test-rate-limit";

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Whole seconds until reset, rounded up.
fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Set `RateLimit-*` headers unless an inner tier already did.
fn set_rate_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, resets_in: Duration) {
    if headers.contains_key(&RATELIMIT_LIMIT) {
        return;
    }
    headers.insert(RATELIMIT_LIMIT, HeaderValue::from(limit));
    headers.insert(RATELIMIT_REMAINING, HeaderValue::from(remaining));
    headers.insert(RATELIMIT_RESET, HeaderValue::from(ceil_secs(resets_in)));
}

/// Per-tier gate. Layer with `from_fn_with_state((state, tier), rate_limit)`.
pub async fn rate_limit(
    State((state, tier)): State<(AppState, Tier)>,
    request: Request,
    next: Next,
) -> Response {
    let policy = state.rate_limiter.config().policy(tier);
    if state.env == AppEnv::Test
        && policy.bypassable
        && !request.headers().contains_key(TEST_RATE_LIMIT_HEADER)
    {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_identity(request.headers(), peer, state.trust_proxy);

    match state.rate_limiter.check(&client, tier).await {
        Decision::Allow {
            limit,
            remaining,
            resets_in,
        } => {
            let mut response = next.run(request).await;
            set_rate_limit_headers(response.headers_mut(), limit, remaining, resets_in);
            response
        }
        Decision::Deny {
            limit,
            resets_in,
            message,
            retry_after,
        } => {
            let mut response = AppError::RateLimited {
                message,
                retry_after,
                retry_after_secs: ceil_secs(resets_in),
            }
            .into_response();
            set_rate_limit_headers(response.headers_mut(), limit, 0, resets_in);
            response
        }
    }
}
