use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result};
use crate::models::{Owned, Role};
use crate::util::extract_bearer_token;

/// The authenticated caller, attached to the request by `require_auth`.
#[derive(Debug, Clone)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Role check. A missing admin role is reported with the
    /// admin-specific message.
    pub fn require_role(&self, required: Role) -> Result<()> {
        if self.role.satisfies(required) {
            return Ok(());
        }
        tracing::debug!(uid = %self.uid, role = self.role.as_str(), required = required.as_str(), "Role check failed");
        match required {
            Role::Admin => Err(AppError::AdminRequired),
            Role::User => Err(AppError::Forbidden),
        }
    }

    /// Whether this caller may modify a resource owned by `owner_id`.
    pub fn can_modify(&self, owner_id: &str) -> bool {
        self.uid == owner_id || self.role.overrides_ownership()
    }
}

/// Ownership gate for a fetched resource.
///
/// Absent resources are `NotFound` before ownership is considered, so a
/// missing id never leaks as `Forbidden`.
pub fn require_ownership<R: Owned>(
    principal: &Principal,
    resource: Option<R>,
    not_found: &str,
) -> Result<R> {
    let resource = resource.ok_or_else(|| AppError::NotFound(not_found.to_string()))?;
    if !principal.can_modify(resource.owner_id()) {
        tracing::debug!(uid = %principal.uid, owner = resource.owner_id(), "Ownership check failed");
        return Err(AppError::Forbidden);
    }
    Ok(resource)
}

/// Resolve the caller from the bearer credential.
///
/// No credential is `Unauthorized`; an invalid one, or a failed role
/// lookup, is `Forbidden`.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal> {
    let token = extract_bearer_token(headers).ok_or(AppError::Unauthorized)?;
    let session = state.tokens.verify(token)?;

    let role = state
        .db
        .get()
        .map_err(AppError::from)
        .and_then(|conn| queries::get_role(&conn, &session.uid))
        .map_err(|e| {
            tracing::error!(uid = %session.uid, "Role lookup failed: {}", e);
            AppError::Forbidden
        })?;

    Ok(Principal {
        uid: session.uid,
        email: session.email,
        role,
    })
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let principal = authenticate(&state, request.headers())?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Must be layered inside `require_auth`.
pub async fn require_admin(request: Request, next: Next) -> Result<Response> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or(AppError::Unauthorized)?;
    principal.require_role(Role::Admin)?;
    Ok(next.run(request).await)
}
