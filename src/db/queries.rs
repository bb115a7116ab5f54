use chrono::Utc;
use rusqlite::{Connection, ErrorCode, OptionalExtension, params, types::Value};

use crate::error::{AppError, Result, msg};
use crate::id::EntityType;
use crate::models::*;

use super::from_row::{
    ACCOUNT_COLS, FAVORITE_COLS, FromRow, INGREDIENT_COLS, PROFILE_COLS, RECIPE_COLS,
    REVIEW_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Builder for dynamic UPDATE statements with optional fields.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
    track_updated_at: bool,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
            track_updated_at: false,
        }
    }

    fn with_updated_at(mut self) -> Self {
        self.track_updated_at = true;
        self
    }

    fn set_opt<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.fields.push((column, v.into()));
        }
        self
    }

    /// Run the update and return the stored document.
    /// `None` when no row matched or nothing was set.
    fn execute_returning<T: FromRow>(
        mut self,
        conn: &Connection,
        returning_cols: &str,
    ) -> Result<Option<T>> {
        if self.fields.is_empty() {
            return Ok(None);
        }
        if self.track_updated_at {
            self.fields.push(("updated_at", now().into()));
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            self.table,
            sets.join(", "),
            returning_cols
        );
        conn.query_row(&sql, rusqlite::params_from_iter(values), T::from_row)
            .optional()
            .map_err(Into::into)
    }
}

fn delete_by_id(conn: &Connection, table: &str, id: &str) -> Result<bool> {
    let affected = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])?;
    Ok(affected > 0)
}

/// Shared shape for `SELECT ... WHERE <filter> ORDER BY ... LIMIT/OFFSET`
/// plus the matching `COUNT(*)`.
fn list_paginated<T: FromRow>(
    conn: &Connection,
    table: &str,
    cols: &str,
    filter: Option<(&str, &str)>,
    order_by: &str,
    limit: i64,
    offset: i64,
) -> Result<(Vec<T>, i64)> {
    match filter {
        Some((column, value)) => {
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM {} WHERE {} = ?1", table, column),
                params![value],
                |row| row.get(0),
            )?;
            let items = query_all(
                conn,
                &format!(
                    "SELECT {} FROM {} WHERE {} = ?1 ORDER BY {} LIMIT ?2 OFFSET ?3",
                    cols, table, column, order_by
                ),
                params![value, limit, offset],
            )?;
            Ok((items, total))
        }
        None => {
            let total: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })?;
            let items = query_all(
                conn,
                &format!(
                    "SELECT {} FROM {} ORDER BY {} LIMIT ?1 OFFSET ?2",
                    cols, table, order_by
                ),
                params![limit, offset],
            )?;
            Ok((items, total))
        }
    }
}

// ============ Accounts & Profiles ============

/// Create an account with its default `user` profile.
///
/// Email is normalized to trimmed lowercase. An existing email is a
/// `BadRequest` with the "already exists" message.
pub fn create_account(conn: &mut Connection, email: &str, password_hash: &str) -> Result<Account> {
    let id = EntityType::User.gen_id();
    let now = now();
    let email = email.trim().to_lowercase();

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO accounts (id, email, password_hash, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, &email, password_hash, now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::BadRequest(msg::EMAIL_EXISTS.into())
        } else {
            e.into()
        }
    })?;
    tx.execute(
        "INSERT INTO profiles (user_id, role, updated_at) VALUES (?1, ?2, ?3)",
        params![&id, Role::User.as_str(), now],
    )?;
    tx.commit()?;

    Ok(Account {
        id,
        email,
        password_hash: password_hash.to_string(),
        created_at: now,
    })
}

pub fn get_account_by_id(conn: &Connection, id: &str) -> Result<Option<Account>> {
    query_one(
        conn,
        &format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLS),
        &[&id],
    )
}

pub fn get_account_by_email(conn: &Connection, email: &str) -> Result<Option<Account>> {
    let email = email.trim().to_lowercase();
    query_one(
        conn,
        &format!("SELECT {} FROM accounts WHERE email = ?1", ACCOUNT_COLS),
        &[&email],
    )
}

pub fn get_profile(conn: &Connection, user_id: &str) -> Result<Option<Profile>> {
    query_one(
        conn,
        &format!("SELECT {} FROM profiles WHERE user_id = ?1", PROFILE_COLS),
        &[&user_id],
    )
}

/// Role for an identity. A missing profile, or any stored value other
/// than exactly `admin`, resolves to `User`.
pub fn get_role(conn: &Connection, user_id: &str) -> Result<Role> {
    let profile = get_profile(conn, user_id)?;
    Ok(Role::from_profile(profile.as_ref().map(|p| p.role.as_str())))
}

/// Upsert the profile role. Returns false if the account does not exist.
pub fn set_role(conn: &Connection, user_id: &str, role: Role) -> Result<bool> {
    if get_account_by_id(conn, user_id)?.is_none() {
        return Ok(false);
    }
    conn.execute(
        "INSERT INTO profiles (user_id, role, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET role = excluded.role, updated_at = excluded.updated_at",
        params![user_id, role.as_str(), now()],
    )?;
    Ok(true)
}

// ============ Recipes ============

pub fn create_recipe(conn: &Connection, created_by: &str, input: &CreateRecipe) -> Result<Recipe> {
    let id = EntityType::Recipe.gen_id();
    let now = now();
    let title = input.title.trim().to_string();
    let description = input.description.trim().to_string();
    let cuisine_type = input.cuisine_type.trim().to_string();

    conn.execute(
        "INSERT INTO recipes (id, title, description, cooking_time, difficulty, cuisine_type, created_by, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &id,
            &title,
            &description,
            input.cooking_time,
            input.difficulty.as_str(),
            &cuisine_type,
            created_by,
            now,
            now
        ],
    )?;

    Ok(Recipe {
        id,
        title,
        description,
        cooking_time: input.cooking_time,
        difficulty: input.difficulty,
        cuisine_type,
        created_by: created_by.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_recipe_by_id(conn: &Connection, id: &str) -> Result<Option<Recipe>> {
    query_one(
        conn,
        &format!("SELECT {} FROM recipes WHERE id = ?1", RECIPE_COLS),
        &[&id],
    )
}

pub fn list_recipes_paginated(
    conn: &Connection,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Recipe>, i64)> {
    list_paginated(conn, "recipes", RECIPE_COLS, None, "created_at DESC, id", limit, offset)
}

/// Update a recipe. `created_by` is never touched.
pub fn update_recipe(conn: &Connection, id: &str, input: &UpdateRecipe) -> Result<Option<Recipe>> {
    UpdateBuilder::new("recipes", id)
        .set_opt("title", input.title.as_deref().map(str::trim).map(String::from))
        .set_opt(
            "description",
            input.description.as_deref().map(str::trim).map(String::from),
        )
        .set_opt("cooking_time", input.cooking_time)
        .set_opt("difficulty", input.difficulty.map(|d| d.as_str().to_string()))
        .set_opt(
            "cuisine_type",
            input.cuisine_type.as_deref().map(str::trim).map(String::from),
        )
        .with_updated_at()
        .execute_returning(conn, RECIPE_COLS)
}

/// Delete a recipe. Ingredients, reviews and favorites go with it.
pub fn delete_recipe(conn: &Connection, id: &str) -> Result<bool> {
    delete_by_id(conn, "recipes", id)
}

// ============ Ingredients ============

pub fn create_ingredient(conn: &Connection, input: &CreateIngredient) -> Result<Ingredient> {
    let id = EntityType::Ingredient.gen_id();
    let name = input.name.trim().to_string();
    let quantity = input.quantity.trim().to_string();
    let unit = input.unit.as_deref().map(|u| u.trim().to_string());

    conn.execute(
        "INSERT INTO ingredients (id, recipe_id, name, quantity, unit) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.recipe_id, &name, &quantity, &unit],
    )?;

    Ok(Ingredient {
        id,
        recipe_id: input.recipe_id.clone(),
        name,
        quantity,
        unit,
    })
}

pub fn get_ingredient_by_id(conn: &Connection, id: &str) -> Result<Option<Ingredient>> {
    query_one(
        conn,
        &format!("SELECT {} FROM ingredients WHERE id = ?1", INGREDIENT_COLS),
        &[&id],
    )
}

pub fn list_ingredients_paginated(
    conn: &Connection,
    recipe_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Ingredient>, i64)> {
    list_paginated(
        conn,
        "ingredients",
        INGREDIENT_COLS,
        recipe_id.map(|r| ("recipe_id", r)),
        "rowid",
        limit,
        offset,
    )
}

pub fn update_ingredient(
    conn: &Connection,
    id: &str,
    input: &UpdateIngredient,
) -> Result<Option<Ingredient>> {
    UpdateBuilder::new("ingredients", id)
        .set_opt("name", input.name.as_deref().map(str::trim).map(String::from))
        .set_opt(
            "quantity",
            input.quantity.as_deref().map(str::trim).map(String::from),
        )
        .set_opt("unit", input.unit.as_deref().map(str::trim).map(String::from))
        .execute_returning(conn, INGREDIENT_COLS)
}

pub fn delete_ingredient(conn: &Connection, id: &str) -> Result<bool> {
    delete_by_id(conn, "ingredients", id)
}

// ============ Reviews ============

pub fn create_review(conn: &Connection, user_id: &str, input: &CreateReview) -> Result<Review> {
    let id = EntityType::Review.gen_id();
    let now = now();
    let comment = input.comment.trim().to_string();

    conn.execute(
        "INSERT INTO reviews (id, recipe_id, user_id, rating, comment, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, &input.recipe_id, user_id, input.rating, &comment, now],
    )?;

    Ok(Review {
        id,
        recipe_id: input.recipe_id.clone(),
        user_id: user_id.to_string(),
        rating: input.rating,
        comment,
        created_at: now,
    })
}

pub fn get_review_by_id(conn: &Connection, id: &str) -> Result<Option<Review>> {
    query_one(
        conn,
        &format!("SELECT {} FROM reviews WHERE id = ?1", REVIEW_COLS),
        &[&id],
    )
}

pub fn list_reviews_paginated(
    conn: &Connection,
    recipe_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Review>, i64)> {
    list_paginated(
        conn,
        "reviews",
        REVIEW_COLS,
        recipe_id.map(|r| ("recipe_id", r)),
        "created_at DESC, id",
        limit,
        offset,
    )
}

pub fn update_review(conn: &Connection, id: &str, input: &UpdateReview) -> Result<Option<Review>> {
    UpdateBuilder::new("reviews", id)
        .set_opt("rating", input.rating)
        .set_opt(
            "comment",
            input.comment.as_deref().map(str::trim).map(String::from),
        )
        .execute_returning(conn, REVIEW_COLS)
}

pub fn delete_review(conn: &Connection, id: &str) -> Result<bool> {
    delete_by_id(conn, "reviews", id)
}

// ============ Favorites ============

/// Add a recipe to a user's favorites. A second add of the same recipe is a
/// `Conflict`.
pub fn create_favorite(conn: &Connection, user_id: &str, recipe_id: &str) -> Result<Favorite> {
    let id = EntityType::Favorite.gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO favorites (id, user_id, recipe_id, added_at) VALUES (?1, ?2, ?3, ?4)",
        params![&id, user_id, recipe_id, now],
    )
    .map_err(|e| {
        if is_unique_violation(&e) {
            AppError::Conflict(msg::ALREADY_FAVORITED.into())
        } else {
            e.into()
        }
    })?;

    Ok(Favorite {
        id,
        user_id: user_id.to_string(),
        recipe_id: recipe_id.to_string(),
        added_at: now,
    })
}

pub fn get_favorite_by_id(conn: &Connection, id: &str) -> Result<Option<Favorite>> {
    query_one(
        conn,
        &format!("SELECT {} FROM favorites WHERE id = ?1", FAVORITE_COLS),
        &[&id],
    )
}

pub fn list_favorites_paginated(
    conn: &Connection,
    user_id: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<Favorite>, i64)> {
    list_paginated(
        conn,
        "favorites",
        FAVORITE_COLS,
        user_id.map(|u| ("user_id", u)),
        "added_at DESC, id",
        limit,
        offset,
    )
}

pub fn delete_favorite(conn: &Connection, id: &str) -> Result<bool> {
    delete_by_id(conn, "favorites", id)
}
