use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result, msg};

use super::check_len;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub quantity: String,
    /// e.g. "grams", "cups"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIngredient {
    pub recipe_id: String,
    pub name: String,
    pub quantity: String,
    #[serde(default)]
    pub unit: Option<String>,
}

impl CreateIngredient {
    pub fn validate(&self) -> Result<()> {
        check_len("recipeId", &self.recipe_id, 1, 64)?;
        check_len("name", &self.name, 1, 100)?;
        check_len("quantity", &self.quantity, 1, 50)?;
        if let Some(ref unit) = self.unit {
            check_len("unit", unit, 1, 30)?;
        }
        Ok(())
    }
}

/// `recipeId` is not updatable: an ingredient stays with its recipe.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

impl UpdateIngredient {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() && self.quantity.is_none() && self.unit.is_none() {
            return Err(AppError::BadRequest(msg::EMPTY_UPDATE.into()));
        }
        if let Some(ref name) = self.name {
            check_len("name", name, 1, 100)?;
        }
        if let Some(ref quantity) = self.quantity {
            check_len("quantity", quantity, 1, 50)?;
        }
        if let Some(ref unit) = self.unit {
            check_len("unit", unit, 1, 30)?;
        }
        Ok(())
    }
}
