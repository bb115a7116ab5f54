use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::middleware::{Principal, require_ownership};
use crate::models::{CreateReview, Review, UpdateReview};
use crate::pagination::{Paginated, PaginationQuery};

use super::{MessageResponse, check_id};

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Review>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) = queries::list_reviews_paginated(&conn, None, limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn list_reviews_for_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Review>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) = queries::list_reviews_paginated(&conn, Some(&recipe_id), limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Review>> {
    check_id(&id, msg::REVIEW_NOT_FOUND)?;
    let conn = state.db.get()?;
    let review = queries::get_review_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(msg::REVIEW_NOT_FOUND.into()))?;
    Ok(Json(review))
}

pub async fn create_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateReview>,
) -> Result<(StatusCode, Json<Review>)> {
    input.validate()?;
    check_id(&input.recipe_id, msg::RECIPE_NOT_FOUND)?;

    let conn = state.db.get()?;
    if queries::get_recipe_by_id(&conn, &input.recipe_id)?.is_none() {
        return Err(AppError::NotFound(msg::RECIPE_NOT_FOUND.into()));
    }

    let review = queries::create_review(&conn, &principal.uid, &input)?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(input): Json<UpdateReview>,
) -> Result<Json<MessageResponse>> {
    check_id(&id, msg::REVIEW_NOT_FOUND)?;
    let conn = state.db.get()?;
    require_ownership(
        &principal,
        queries::get_review_by_id(&conn, &id)?,
        msg::REVIEW_NOT_FOUND,
    )?;
    input.validate()?;

    queries::update_review(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound(msg::REVIEW_NOT_FOUND.into()))?;
    Ok(Json(MessageResponse::new("Review updated successfully")))
}

/// Authors delete their own reviews; admins may delete any.
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    check_id(&id, msg::REVIEW_NOT_FOUND)?;
    let conn = state.db.get()?;
    require_ownership(
        &principal,
        queries::get_review_by_id(&conn, &id)?,
        msg::REVIEW_NOT_FOUND,
    )?;

    if !queries::delete_review(&conn, &id)? {
        return Err(AppError::NotFound(msg::REVIEW_NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Review deleted successfully")))
}
