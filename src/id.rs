//! Prefixed ID generation for stored documents.
//!
//! Format: `{entity}_{uuid_simple}` (32 hex chars, no hyphens)

use uuid::Uuid;

const ALL_PREFIXES: &[&str] = &["usr_", "rcp_", "ing_", "rev_", "fav_"];

/// Cheap format check to reject garbage before hitting the database.
pub fn is_valid_prefixed_id(s: &str) -> bool {
    let Some(prefix) = ALL_PREFIXES.iter().find(|p| s.starts_with(*p)) else {
        return false;
    };

    let hex_part = &s[prefix.len()..];
    hex_part.len() == 32 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

#[derive(Debug, Clone, Copy)]
pub enum EntityType {
    User,
    Recipe,
    Ingredient,
    Review,
    Favorite,
}

impl EntityType {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::User => "usr",
            Self::Recipe => "rcp",
            Self::Ingredient => "ing",
            Self::Review => "rev",
            Self::Favorite => "fav",
        }
    }

    pub fn gen_id(&self) -> String {
        format!("{}_{}", self.prefix(), Uuid::new_v4().as_simple())
    }
}
