//! Fixed-window rate limiting for the API.
//!
//! Requests are counted per client identity (normally the peer IP) in three
//! independent tiers:
//! - Auth: /api/auth/register, /api/auth/login (5 per 15 minutes)
//! - Sensitive: writes to recipes, ingredients, reviews, favorites (10 per 15 minutes)
//! - Api: every /api route (100 per hour)
//!
//! Thresholds can be overridden via environment variables:
//! - RATE_LIMIT_AUTH_MAX
//! - RATE_LIMIT_SENSITIVE_MAX
//! - RATE_LIMIT_API_MAX

mod clock;
mod policy;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{RateLimitConfig, Tier, TierPolicy};
pub use store::{CounterStore, MemoryCounterStore, WindowCount};

use std::sync::Arc;
use std::time::Duration;

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow {
        limit: u32,
        remaining: u32,
        resets_in: Duration,
    },
    Deny {
        limit: u32,
        resets_in: Duration,
        message: &'static str,
        retry_after: &'static str,
    },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }
}

/// Process-wide rate limit state: the tier policies plus the counter table.
///
/// Created at startup, shared through `AppState`, cleared with `reset_all`.
#[derive(Debug, Clone)]
pub struct RateLimitGate {
    config: RateLimitConfig,
    store: Arc<dyn CounterStore>,
}

impl RateLimitGate {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_store(config, Arc::new(MemoryCounterStore::new()))
    }

    pub fn with_store(config: RateLimitConfig, store: Arc<dyn CounterStore>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request from `client` against `tier`.
    ///
    /// The request that brings the count to exactly `max_requests` is allowed.
    pub async fn check(&self, client: &str, tier: Tier) -> Decision {
        let policy = self.config.policy(tier);
        let key = format!("{}:{}", tier, client);
        let WindowCount { count, resets_in } = self.store.increment(&key, policy.window).await;

        if count > policy.max_requests {
            tracing::warn!(tier = %tier, client, count, "Rate limit exceeded");
            Decision::Deny {
                limit: policy.max_requests,
                resets_in,
                message: policy.message,
                retry_after: policy.retry_after,
            }
        } else {
            Decision::Allow {
                limit: policy.max_requests,
                remaining: policy.max_requests - count,
                resets_in,
            }
        }
    }

    /// Clear every counter in every tier.
    pub async fn reset_all(&self) {
        self.store.reset_all().await;
        tracing::debug!("Rate limit counters reset");
    }
}
