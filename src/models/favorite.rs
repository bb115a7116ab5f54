use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::{Owned, check_len};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub recipe_id: String,
    pub added_at: i64,
}

impl Owned for Favorite {
    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFavorite {
    pub recipe_id: String,
}

impl CreateFavorite {
    pub fn validate(&self) -> Result<()> {
        check_len("recipeId", &self.recipe_id, 1, 64)
    }
}
