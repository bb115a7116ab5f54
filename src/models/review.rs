use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, msg};

use super::{Owned, check_len};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub recipe_id: String,
    /// Author. Set from the caller at creation.
    pub user_id: String,
    /// 1-5 stars
    pub rating: i64,
    pub comment: String,
    pub created_at: i64,
}

impl Owned for Review {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

fn validate_rating(rating: i64) -> Result<()> {
    if !(1..=5).contains(&rating) {
        return Err(AppError::BadRequest("\"rating\" must be between 1 and 5".into()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReview {
    pub recipe_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

impl CreateReview {
    pub fn validate(&self) -> Result<()> {
        check_len("recipeId", &self.recipe_id, 1, 64)?;
        validate_rating(self.rating)?;
        check_len("comment", &self.comment, 0, 1000)?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReview {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

impl UpdateReview {
    pub fn validate(&self) -> Result<()> {
        if self.rating.is_none() && self.comment.is_none() {
            return Err(AppError::BadRequest(msg::EMPTY_UPDATE.into()));
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if let Some(ref comment) = self.comment {
            check_len("comment", comment, 0, 1000)?;
        }
        Ok(())
    }
}
