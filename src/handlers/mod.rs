mod auth;
mod favorites;
mod ingredients;
mod public;
mod recipes;
mod reviews;
mod users;

pub use auth::*;
pub use favorites::*;
pub use ingredients::*;
pub use public::*;
pub use recipes::*;
pub use reviews::*;
pub use users::*;

use axum::{
    Router, middleware,
    routing::{MethodRouter, delete, get, post, put},
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::AppState;
use crate::error::{AppError, Result};
use crate::id::is_valid_prefixed_id;
use crate::middleware::{rate_limit, require_admin, require_auth, security_headers};
use crate::rate_limit::Tier;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Malformed ids can't exist, so they are reported as not found without a
/// store lookup.
pub(crate) fn check_id(id: &str, not_found: &str) -> Result<()> {
    if is_valid_prefixed_id(id) {
        Ok(())
    } else {
        Err(AppError::NotFound(not_found.to_string()))
    }
}

/// Resource writes: sensitive tier first, then authentication.
fn write(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(
                (state.clone(), Tier::Sensitive),
                rate_limit,
            ))
            .layer(middleware::from_fn_with_state(state.clone(), require_auth)),
    )
}

fn authed(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

fn admin(route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
    route.route_layer(
        ServiceBuilder::new()
            .layer(middleware::from_fn_with_state(state.clone(), require_auth))
            .layer(middleware::from_fn(require_admin)),
    )
}

fn api_router(state: &AppState) -> Router<AppState> {
    let auth_tier = middleware::from_fn_with_state((state.clone(), Tier::Auth), rate_limit);

    let accounts = Router::new()
        .route("/auth/register", post(register).route_layer(auth_tier.clone()))
        .route("/auth/login", post(login).route_layer(auth_tier))
        .route("/users/me", authed(get(get_current_user), state))
        .route("/admin/users/{id}/role", admin(put(update_user_role), state));

    let recipes = Router::new()
        .route(
            "/recipes",
            get(list_recipes).merge(write(post(create_recipe), state)),
        )
        .route(
            "/recipes/{id}",
            get(get_recipe).merge(write(put(update_recipe).delete(delete_recipe), state)),
        );

    let ingredients = Router::new()
        .route(
            "/ingredients",
            get(list_ingredients).merge(write(post(create_ingredient), state)),
        )
        .route("/ingredients/recipe/{recipe_id}", get(list_ingredients_for_recipe))
        .route(
            "/ingredients/{id}",
            get(get_ingredient).merge(write(
                put(update_ingredient).delete(delete_ingredient),
                state,
            )),
        );

    let reviews = Router::new()
        .route(
            "/reviews",
            get(list_reviews).merge(write(post(create_review), state)),
        )
        .route("/reviews/recipe/{recipe_id}", get(list_reviews_for_recipe))
        .route(
            "/reviews/{id}",
            get(get_review).merge(write(put(update_review).delete(delete_review), state)),
        );

    let favorites = Router::new()
        .route(
            "/favorites",
            get(list_favorites).merge(write(post(create_favorite), state)),
        )
        .route("/favorites/user/{user_id}", get(list_favorites_for_user))
        .route(
            "/favorites/{id}",
            get(get_favorite).merge(write(delete(delete_favorite), state)),
        );

    Router::new()
        .merge(accounts)
        .merge(recipes)
        .merge(ingredients)
        .merge(reviews)
        .merge(favorites)
        // Outermost: every /api request counts against the api tier first
        .route_layer(middleware::from_fn_with_state(
            (state.clone(), Tier::Api),
            rate_limit,
        ))
}

/// The full application: public routes, `/api`, tracing, CORS and
/// security headers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api_router(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        // Outermost so CORS preflights and gate rejections carry the headers too
        .layer(middleware::from_fn(security_headers))
        .with_state(state)
}
