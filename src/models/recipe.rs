use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, msg};

use super::{Owned, check_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(AppError::BadRequest(format!("Invalid difficulty: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Minutes
    pub cooking_time: i64,
    pub difficulty: Difficulty,
    pub cuisine_type: String,
    /// Set at creation, never updated.
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Owned for Recipe {
    fn owner_id(&self) -> &str {
        &self.created_by
    }
}

fn validate_cooking_time(minutes: i64) -> Result<()> {
    if !(1..=1000).contains(&minutes) {
        return Err(AppError::BadRequest(
            "\"cookingTime\" must be between 1 and 1000".into(),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecipe {
    pub title: String,
    pub description: String,
    pub cooking_time: i64,
    pub difficulty: Difficulty,
    pub cuisine_type: String,
}

impl CreateRecipe {
    pub fn validate(&self) -> Result<()> {
        check_len("title", &self.title, 3, 100)?;
        check_len("description", &self.description, 10, 500)?;
        validate_cooking_time(self.cooking_time)?;
        check_len("cuisineType", &self.cuisine_type, 2, 50)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecipe {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cooking_time: Option<i64>,
    pub difficulty: Option<Difficulty>,
    pub cuisine_type: Option<String>,
}

impl UpdateRecipe {
    pub fn validate(&self) -> Result<()> {
        if self.title.is_none()
            && self.description.is_none()
            && self.cooking_time.is_none()
            && self.difficulty.is_none()
            && self.cuisine_type.is_none()
        {
            return Err(AppError::BadRequest(msg::EMPTY_UPDATE.into()));
        }
        if let Some(ref title) = self.title {
            check_len("title", title, 3, 100)?;
        }
        if let Some(ref description) = self.description {
            check_len("description", description, 10, 500)?;
        }
        if let Some(minutes) = self.cooking_time {
            validate_cooking_time(minutes)?;
        }
        if let Some(ref cuisine_type) = self.cuisine_type {
            check_len("cuisineType", cuisine_type, 2, 50)?;
        }
        Ok(())
    }
}
