use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::middleware::{Principal, require_ownership};
use crate::models::{CreateFavorite, Favorite};
use crate::pagination::{Paginated, PaginationQuery};

use super::{MessageResponse, check_id};

pub async fn list_favorites(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Favorite>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) = queries::list_favorites_paginated(&conn, None, limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn list_favorites_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Favorite>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) = queries::list_favorites_paginated(&conn, Some(&user_id), limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn get_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Favorite>> {
    check_id(&id, msg::FAVORITE_NOT_FOUND)?;
    let conn = state.db.get()?;
    let favorite = queries::get_favorite_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(msg::FAVORITE_NOT_FOUND.into()))?;
    Ok(Json(favorite))
}

pub async fn create_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateFavorite>,
) -> Result<(StatusCode, Json<Favorite>)> {
    input.validate()?;
    check_id(&input.recipe_id, msg::RECIPE_NOT_FOUND)?;

    let conn = state.db.get()?;
    if queries::get_recipe_by_id(&conn, &input.recipe_id)?.is_none() {
        return Err(AppError::NotFound(msg::RECIPE_NOT_FOUND.into()));
    }

    let favorite = queries::create_favorite(&conn, &principal.uid, &input.recipe_id)?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

pub async fn delete_favorite(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    check_id(&id, msg::FAVORITE_NOT_FOUND)?;
    let conn = state.db.get()?;
    require_ownership(
        &principal,
        queries::get_favorite_by_id(&conn, &id)?,
        msg::FAVORITE_NOT_FOUND,
    )?;

    if !queries::delete_favorite(&conn, &id)? {
        return Err(AppError::NotFound(msg::FAVORITE_NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Favorite deleted successfully")))
}
