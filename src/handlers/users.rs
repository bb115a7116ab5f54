use axum::extract::{Extension, State};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path};
use crate::middleware::Principal;
use crate::models::{CurrentUser, UpdateRole};

pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<CurrentUser>> {
    let conn = state.db.get()?;
    let account = queries::get_account_by_id(&conn, &principal.uid)?
        .ok_or_else(|| AppError::NotFound(msg::USER_NOT_FOUND.into()))?;

    Ok(Json(CurrentUser {
        uid: account.id,
        email: account.email,
        role: principal.role,
    }))
}

/// Admin only: assign a role to an account.
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(input): Json<UpdateRole>,
) -> Result<Json<CurrentUser>> {
    let role = input.parse()?;

    let conn = state.db.get()?;
    let account = queries::get_account_by_id(&conn, &user_id)?
        .ok_or_else(|| AppError::NotFound(msg::USER_NOT_FOUND.into()))?;
    queries::set_role(&conn, &account.id, role)?;

    tracing::info!(
        admin = %principal.uid,
        uid = %account.id,
        role = role.as_str(),
        "Role updated"
    );

    Ok(Json(CurrentUser {
        uid: account.id,
        email: account.email,
        role,
    }))
}
