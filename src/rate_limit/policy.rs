use std::fmt;
use std::time::Duration;

const FIFTEEN_MINUTES: Duration = Duration::from_secs(15 * 60);
const ONE_HOUR: Duration = Duration::from_secs(60 * 60);

const GENERIC_MESSAGE: &str = "Too many requests from this IP, please try again later.";
const SENSITIVE_MESSAGE: &str =
    "Too many requests from this IP on sensitive endpoints, please try again later.";

/// Named rate-limit policy applied to a class of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Registration and login.
    Auth,
    /// Write operations on user content.
    Sensitive,
    /// Every `/api` route.
    Api,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Auth, Tier::Sensitive, Tier::Api];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Auth => "auth",
            Tier::Sensitive => "sensitive",
            Tier::Api => "api",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Window and threshold for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPolicy {
    pub window: Duration,
    pub max_requests: u32,
    /// `error` field of the 429 body.
    pub message: &'static str,
    /// `retryAfter` field of the 429 body.
    pub retry_after: &'static str,
    /// Whether test mode skips this tier for requests without the opt-in header.
    pub bypassable: bool,
}

/// Policies for all three tiers. Built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub auth: TierPolicy,
    pub sensitive: TierPolicy,
    pub api: TierPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            auth: TierPolicy {
                window: FIFTEEN_MINUTES,
                max_requests: 5,
                message: GENERIC_MESSAGE,
                retry_after: "15 minutes",
                bypassable: true,
            },
            sensitive: TierPolicy {
                window: FIFTEEN_MINUTES,
                max_requests: 10,
                message: SENSITIVE_MESSAGE,
                retry_after: "15 minutes",
                bypassable: true,
            },
            api: TierPolicy {
                window: ONE_HOUR,
                max_requests: 100,
                message: GENERIC_MESSAGE,
                retry_after: "1 hour",
                bypassable: false,
            },
        }
    }
}

impl RateLimitConfig {
    pub fn policy(&self, tier: Tier) -> &TierPolicy {
        match tier {
            Tier::Auth => &self.auth,
            Tier::Sensitive => &self.sensitive,
            Tier::Api => &self.api,
        }
    }

    fn policy_mut(&mut self, tier: Tier) -> &mut TierPolicy {
        match tier {
            Tier::Auth => &mut self.auth,
            Tier::Sensitive => &mut self.sensitive,
            Tier::Api => &mut self.api,
        }
    }

    /// Override a tier's threshold. `None` keeps the default.
    pub fn with_max(mut self, tier: Tier, max_requests: Option<u32>) -> Self {
        if let Some(max) = max_requests {
            assert!(max > 0, "Rate limit must be greater than 0");
            self.policy_mut(tier).max_requests = max;
        }
        self
    }
}
