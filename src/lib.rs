//! Recipe API - recipes, ingredients, reviews and favorites over HTTP/JSON
//!
//! Every request passes a per-client fixed-window rate limiter and, on
//! protected routes, a bearer-token authorization gate with role and
//! ownership checks.

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod id;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod rate_limit;
pub mod util;
