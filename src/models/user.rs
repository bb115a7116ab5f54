use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, msg};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Basic email format validation.
///
/// Validates that email has:
/// - Exactly one @ symbol
/// - Non-empty local part (before @)
/// - Non-empty domain part (after @)
/// - At least one dot in the domain
///
/// Not RFC 5322 - just a sanity check.
pub fn validate_email_format(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::BadRequest(msg::EMAIL_REQUIRED.into()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    let local_part = parts[0];
    let domain_part = parts[1];

    if local_part.is_empty() || local_part.contains(' ') {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    if domain_part.is_empty()
        || !domain_part.contains('.')
        || domain_part.starts_with('.')
        || domain_part.ends_with('.')
    {
        return Err(AppError::BadRequest(msg::INVALID_EMAIL_FORMAT.into()));
    }

    Ok(())
}

/// Caller role. `Admin` outranks `User` and overrides ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Role from a stored profile value. Anything but exactly `admin` is a user.
    pub fn from_profile(stored: Option<&str>) -> Self {
        match stored {
            Some("admin") => Role::Admin,
            _ => Role::User,
        }
    }

    pub fn satisfies(&self, required: Role) -> bool {
        *self >= required
    }

    pub fn overrides_ownership(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(AppError::BadRequest(msg::INVALID_ROLE.into())),
        }
    }
}

/// Credential record held by the identity provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: i64,
}

/// Role assignment for an account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub role: String,
    pub updated_at: i64,
}

/// Missing fields deserialize as empty so validation names them.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn validate(&self) -> Result<()> {
        validate_email_format(&self.email)?;
        if self.password.is_empty() {
            return Err(AppError::BadRequest(msg::PASSWORD_REQUIRED.into()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(msg::WEAK_PASSWORD.into()));
        }
        Ok(())
    }

    /// Login only needs both fields present; strength rules apply at
    /// registration.
    pub fn require_present(&self) -> Result<()> {
        if self.email.trim().is_empty() {
            return Err(AppError::BadRequest(msg::EMAIL_REQUIRED.into()));
        }
        if self.password.is_empty() {
            return Err(AppError::BadRequest(msg::PASSWORD_REQUIRED.into()));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub uid: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUser {
    pub uid: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRole {
    pub role: String,
}

impl UpdateRole {
    pub fn parse(&self) -> Result<Role> {
        self.role.trim().parse()
    }
}
