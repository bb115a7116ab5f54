use serde::{Deserialize, Serialize};

/// Issuer stamped on every session token.
pub const ISSUER: &str = "recipe-api";

/// Custom claims for session tokens.
/// Standard claims (iss, sub, iat, exp) are handled by jwt-simple; `sub`
/// carries the identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub email: String,
}

/// A token that passed signature, issuer and expiry checks.
#[derive(Debug, Clone)]
pub struct VerifiedSession {
    pub uid: String,
    pub email: String,
}
