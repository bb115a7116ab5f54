mod favorite;
mod ingredient;
mod recipe;
mod review;
mod user;

pub use favorite::*;
pub use ingredient::*;
pub use recipe::*;
pub use review::*;
pub use user::*;

use crate::error::{AppError, Result};

/// A stored document that records which user created it.
pub trait Owned {
    fn owner_id(&self) -> &str;
}

/// Trimmed length check in characters, with a Joi-style message.
pub(crate) fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<()> {
    let len = value.trim().chars().count();
    if len < min {
        return Err(AppError::BadRequest(if min == 1 {
            format!("\"{}\" is not allowed to be empty", field)
        } else {
            format!("\"{}\" length must be at least {} characters long", field, min)
        }));
    }
    if len > max {
        return Err(AppError::BadRequest(format!(
            "\"{}\" length must be less than or equal to {} characters long",
            field, max
        )));
    }
    Ok(())
}
