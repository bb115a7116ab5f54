//! Ingredients have no owner of their own: every write is checked against
//! the parent recipe's creator.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::middleware::{Principal, require_ownership};
use crate::models::{CreateIngredient, Ingredient, UpdateIngredient};
use crate::pagination::{Paginated, PaginationQuery};

use super::{MessageResponse, check_id};

/// Fetch an ingredient and check the caller owns its recipe.
fn owned_ingredient(conn: &Connection, principal: &Principal, id: &str) -> Result<Ingredient> {
    check_id(id, msg::INGREDIENT_NOT_FOUND)?;
    let ingredient = queries::get_ingredient_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(msg::INGREDIENT_NOT_FOUND.into()))?;
    require_ownership(
        principal,
        queries::get_recipe_by_id(conn, &ingredient.recipe_id)?,
        msg::RECIPE_NOT_FOUND,
    )?;
    Ok(ingredient)
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Ingredient>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) = queries::list_ingredients_paginated(&conn, None, limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn list_ingredients_for_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<String>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Ingredient>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (items, total) =
        queries::list_ingredients_paginated(&conn, Some(&recipe_id), limit, offset)?;
    Ok(Json(Paginated::new(items, total, limit, offset)))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>> {
    check_id(&id, msg::INGREDIENT_NOT_FOUND)?;
    let conn = state.db.get()?;
    let ingredient = queries::get_ingredient_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(msg::INGREDIENT_NOT_FOUND.into()))?;
    Ok(Json(ingredient))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateIngredient>,
) -> Result<(StatusCode, Json<Ingredient>)> {
    input.validate()?;

    let conn = state.db.get()?;
    check_id(&input.recipe_id, msg::RECIPE_NOT_FOUND)?;
    require_ownership(
        &principal,
        queries::get_recipe_by_id(&conn, &input.recipe_id)?,
        msg::RECIPE_NOT_FOUND,
    )?;

    let ingredient = queries::create_ingredient(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(input): Json<UpdateIngredient>,
) -> Result<Json<MessageResponse>> {
    let conn = state.db.get()?;
    owned_ingredient(&conn, &principal, &id)?;
    input.validate()?;

    queries::update_ingredient(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound(msg::INGREDIENT_NOT_FOUND.into()))?;
    Ok(Json(MessageResponse::new("Ingredient updated successfully")))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let conn = state.db.get()?;
    owned_ingredient(&conn, &principal, &id)?;

    if !queries::delete_ingredient(&conn, &id)? {
        return Err(AppError::NotFound(msg::INGREDIENT_NOT_FOUND.into()));
    }
    Ok(Json(MessageResponse::new("Ingredient deleted successfully")))
}
