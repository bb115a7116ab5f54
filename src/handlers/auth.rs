use axum::{extract::State, http::StatusCode};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::Json;
use crate::models::{Credentials, LoginResponse, RegisterResponse};

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    input.validate()?;

    {
        let conn = state.db.get()?;
        if queries::get_account_by_email(&conn, &input.email)?.is_some() {
            return Err(AppError::BadRequest(msg::EMAIL_EXISTS.into()));
        }
    }

    let password_hash = state.hasher.hash(input.password).await?;

    let mut conn = state.db.get()?;
    let account = queries::create_account(&mut conn, &input.email, &password_hash)?;

    tracing::info!(uid = %account.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully",
            uid: account.id,
            email: account.email,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> Result<Json<LoginResponse>> {
    input.require_present()?;

    let account = {
        let conn = state.db.get()?;
        queries::get_account_by_email(&conn, &input.email)?
    };
    let Some(account) = account else {
        tracing::debug!("Login failed: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let valid = state
        .hasher
        .verify(input.password, account.password_hash.clone())
        .await?;
    if !valid {
        tracing::debug!(uid = %account.id, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(&account.id, &account.email)?;

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        uid: account.id,
        email: account.email,
    }))
}
