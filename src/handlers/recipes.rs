use axum::{
    extract::{Extension, State},
    http::StatusCode,
};

use crate::db::{AppState, queries};
use crate::error::{AppError, Result, msg};
use crate::extractors::{Json, Path, Query};
use crate::middleware::{Principal, require_ownership};
use crate::models::{CreateRecipe, Recipe, UpdateRecipe};
use crate::pagination::{Paginated, PaginationQuery};

use super::check_id;

pub async fn list_recipes(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Recipe>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let offset = pagination.offset();
    let (recipes, total) = queries::list_recipes_paginated(&conn, limit, offset)?;
    Ok(Json(Paginated::new(recipes, total, limit, offset)))
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recipe>> {
    check_id(&id, msg::RECIPE_NOT_FOUND)?;
    let conn = state.db.get()?;
    let recipe = queries::get_recipe_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound(msg::RECIPE_NOT_FOUND.into()))?;
    Ok(Json(recipe))
}

pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateRecipe>,
) -> Result<(StatusCode, Json<Recipe>)> {
    input.validate()?;

    let conn = state.db.get()?;
    let recipe = queries::create_recipe(&conn, &principal.uid, &input)?;

    tracing::debug!(id = %recipe.id, created_by = %principal.uid, "Recipe created");
    Ok((StatusCode::CREATED, Json(recipe)))
}

pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    Json(input): Json<UpdateRecipe>,
) -> Result<Json<Recipe>> {
    check_id(&id, msg::RECIPE_NOT_FOUND)?;
    let conn = state.db.get()?;
    require_ownership(
        &principal,
        queries::get_recipe_by_id(&conn, &id)?,
        msg::RECIPE_NOT_FOUND,
    )?;
    input.validate()?;

    let recipe = queries::update_recipe(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound(msg::RECIPE_NOT_FOUND.into()))?;
    Ok(Json(recipe))
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    check_id(&id, msg::RECIPE_NOT_FOUND)?;
    let conn = state.db.get()?;
    require_ownership(
        &principal,
        queries::get_recipe_by_id(&conn, &id)?,
        msg::RECIPE_NOT_FOUND,
    )?;

    if !queries::delete_recipe(&conn, &id)? {
        return Err(AppError::NotFound(msg::RECIPE_NOT_FOUND.into()));
    }
    tracing::debug!(id = %id, by = %principal.uid, "Recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
