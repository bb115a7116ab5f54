use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    message: &'static str,
    /// RFC 3339, millisecond precision
    timestamp: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "Recipe API is running!",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

#[derive(Serialize)]
pub struct Endpoints {
    health: &'static str,
    auth: &'static str,
    users: &'static str,
    recipes: &'static str,
    ingredients: &'static str,
    reviews: &'static str,
    favorites: &'static str,
}

#[derive(Serialize)]
pub struct WelcomeResponse {
    message: &'static str,
    endpoints: Endpoints,
}

pub async fn root() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to Indian Recipe API! 🍛",
        endpoints: Endpoints {
            health: "/health",
            auth: "/api/auth",
            users: "/api/users",
            recipes: "/api/recipes",
            ingredients: "/api/ingredients",
            reviews: "/api/reviews",
            favorites: "/api/favorites",
        },
    })
}
