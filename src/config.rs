use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::rate_limit::{RateLimitConfig, Tier};

/// Fallback signing secret for development and test runs.
const DEV_JWT_SECRET: &str = "recipe-api-dev-secret-do-not-use-in-production";

/// Execution mode of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Development,
    /// Rate limits on bypassable tiers only apply to requests that opt in.
    Test,
}

impl AppEnv {
    pub fn is_production(&self) -> bool {
        matches!(self, AppEnv::Production)
    }
}

impl FromStr for AppEnv {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(AppEnv::Production),
            "development" | "dev" => Ok(AppEnv::Development),
            "test" => Ok(AppEnv::Test),
            other => Err(ConfigError::Invalid("APP_ENV", other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub env: AppEnv,
    pub jwt_secret: String,
    pub token_ttl_hours: u64,
    /// Take client identity from `x-forwarded-for` / `x-real-ip` when set.
    pub trust_proxy: bool,
    pub bootstrap_admin_email: Option<String>,
    pub rate_limit: RateLimitConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let env_mode = match env::var("APP_ENV") {
            Ok(v) => v.parse()?,
            Err(_) => AppEnv::Production,
        };

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if env_mode.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            _ => DEV_JWT_SECRET.to_string(),
        };

        let rate_limit = RateLimitConfig::default()
            .with_max(Tier::Auth, parse_limit("RATE_LIMIT_AUTH_MAX")?)
            .with_max(Tier::Sensitive, parse_limit("RATE_LIMIT_SENSITIVE_MAX")?)
            .with_max(Tier::Api, parse_limit("RATE_LIMIT_API_MAX")?);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT")?.unwrap_or(3000),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "recipes.db".to_string()),
            env: env_mode,
            jwt_secret,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS")?.unwrap_or(24),
            trust_proxy: parse_var::<bool>("TRUST_PROXY")?.unwrap_or(false),
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            rate_limit,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse an optional environment variable, rejecting values that do not parse.
fn parse_var<T: FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Rate limit thresholds must be positive.
fn parse_limit(name: &'static str) -> Result<Option<u32>, ConfigError> {
    match parse_var::<u32>(name)? {
        Some(0) => Err(ConfigError::Invalid(name, "0".to_string())),
        other => Ok(other),
    }
}
