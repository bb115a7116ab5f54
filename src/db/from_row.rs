//! Row mapping for stored documents.
//!
//! Each document type implements `FromRow` against its `*_COLS` column list,
//! so queries can go through `query_one` / `query_all` instead of repeating
//! mapping closures.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a text column into an enum, surfacing bad values as column errors
/// instead of panicking.
fn parse_column<T>(row: &Row, col: usize, col_name: &str, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(col)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const ACCOUNT_COLS: &str = "id, email, password_hash, created_at";

pub const PROFILE_COLS: &str = "user_id, role, updated_at";

pub const RECIPE_COLS: &str = "id, title, description, cooking_time, difficulty, cuisine_type, created_by, created_at, updated_at";

pub const INGREDIENT_COLS: &str = "id, recipe_id, name, quantity, unit";

pub const REVIEW_COLS: &str = "id, recipe_id, user_id, rating, comment, created_at";

pub const FAVORITE_COLS: &str = "id, user_id, recipe_id, added_at";

// ============ FromRow Implementations ============

impl FromRow for Account {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Account {
            id: row.get(0)?,
            email: row.get(1)?,
            password_hash: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Profile {
            user_id: row.get(0)?,
            role: row.get(1)?,
            updated_at: row.get(2)?,
        })
    }
}

impl FromRow for Recipe {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Recipe {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            cooking_time: row.get(3)?,
            difficulty: parse_column(row, 4, "difficulty", |s| s.parse::<Difficulty>().ok())?,
            cuisine_type: row.get(5)?,
            created_by: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl FromRow for Ingredient {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Ingredient {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            unit: row.get(4)?,
        })
    }
}

impl FromRow for Review {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Review {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            user_id: row.get(2)?,
            rating: row.get(3)?,
            comment: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl FromRow for Favorite {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Favorite {
            id: row.get(0)?,
            user_id: row.get(1)?,
            recipe_id: row.get(2)?,
            added_at: row.get(3)?,
        })
    }
}
