use std::collections::HashSet;
use std::fmt;

use jwt_simple::prelude::*;

use crate::error::{AppError, Result};

use super::{ISSUER, SessionClaims, VerifiedSession};

/// Issues and verifies HS256 session tokens.
#[derive(Clone)]
pub struct TokenService {
    key: HS256Key,
    ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl.as_secs())
            .finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        Self {
            key: HS256Key::from_bytes(secret.as_bytes()),
            ttl: Duration::from_hours(ttl_hours),
        }
    }

    /// Sign a session token for `uid`.
    pub fn issue(&self, uid: &str, email: &str) -> Result<String> {
        let claims = Claims::with_custom_claims(
            SessionClaims {
                email: email.to_string(),
            },
            self.ttl,
        )
        .with_issuer(ISSUER)
        .with_subject(uid);

        self.key
            .authenticate(claims)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token. Any failure (malformed, bad signature, expired,
    /// wrong issuer, no subject) is `Forbidden`.
    pub fn verify(&self, token: &str) -> Result<VerifiedSession> {
        let options = VerificationOptions {
            allowed_issuers: Some(HashSet::from_strings(&[ISSUER])),
            ..Default::default()
        };

        let claims = self
            .key
            .verify_token::<SessionClaims>(token, Some(options))
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                AppError::Forbidden
            })?;

        let uid = claims.subject.ok_or_else(|| {
            tracing::debug!("Token has no subject");
            AppError::Forbidden
        })?;

        Ok(VerifiedSession {
            uid,
            email: claims.custom.email,
        })
    }
}
