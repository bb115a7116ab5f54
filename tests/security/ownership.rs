//! Ownership tests.
//!
//! Recipes, reviews and favorites belong to the user who created them.
//! Ingredients belong to whoever owns their recipe. Admins may modify
//! anything; everyone else gets 403 on documents they don't own.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use axum::http::StatusCode;
use serde_json::json;

struct Cast {
    state: AppState,
    app: axum::Router,
    owner_uid: String,
    owner: String,
    other: String,
    admin: String,
}

async fn cast() -> Cast {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (owner_uid, owner) = register_and_login(&app, "owner@example.com").await;
    let (_, other) = register_and_login(&app, "other@example.com").await;
    let (admin_uid, admin) = register_and_login(&app, "admin@example.com").await;
    make_admin(&state, &admin_uid);
    Cast {
        state,
        app,
        owner_uid,
        owner,
        other,
        admin,
    }
}

#[tokio::test]
async fn test_recipe_update_by_owner_other_and_admin() {
    let c = cast().await;
    let id = create_recipe(&c.app, &c.owner).await;
    let uri = format!("/api/recipes/{}", id);

    let (status, _, body) = ApiRequest::put(&uri, json!({ "cookingTime": 55 }))
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": "Forbidden" }));

    let (status, _, body) = ApiRequest::put(&uri, json!({ "cookingTime": 55 }))
        .token(&c.owner)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cookingTime"], 55);

    let (status, _, body) = ApiRequest::put(&uri, json!({ "difficulty": "Hard" }))
        .token(&c.admin)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["difficulty"], "Hard");
    // Admin edits don't transfer ownership
    assert_eq!(body["createdBy"], c.owner_uid.as_str());
}

#[tokio::test]
async fn test_recipe_delete_by_other_is_forbidden() {
    let c = cast().await;
    let id = create_recipe(&c.app, &c.owner).await;
    let uri = format!("/api/recipes/{}", id);

    let (status, _, _) = ApiRequest::delete(&uri).token(&c.other).send(&c.app).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = ApiRequest::get(&uri).send(&c.app).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = ApiRequest::delete(&uri).token(&c.admin).send(&c.app).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);
}

#[tokio::test]
async fn test_missing_recipe_is_404_before_ownership() {
    let c = cast().await;

    let (status, _, body) = ApiRequest::put(
        "/api/recipes/rcp_00000000000000000000000000000000",
        json!({ "title": "Anything" }),
    )
    .token(&c.other)
    .send(&c.app)
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Recipe not found" }));
}

#[tokio::test]
async fn test_ownership_checked_before_body_validation() {
    let c = cast().await;
    let id = create_recipe(&c.app, &c.owner).await;

    let (status, _, _) = ApiRequest::put(format!("/api/recipes/{}", id), json!({}))
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_ingredients_follow_recipe_owner() {
    let c = cast().await;
    let recipe_id = create_recipe(&c.app, &c.owner).await;
    let ingredient = json!({ "recipeId": recipe_id, "name": "Chickpeas", "quantity": "2", "unit": "cups" });

    let (status, _, _) = ApiRequest::post("/api/ingredients", ingredient.clone())
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = ApiRequest::post("/api/ingredients", ingredient)
        .token(&c.owner)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/ingredients/{}", body["id"].as_str().unwrap());

    let (status, _, _) = ApiRequest::put(&uri, json!({ "quantity": "3" }))
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = ApiRequest::delete(&uri).token(&c.other).send(&c.app).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = ApiRequest::put(&uri, json!({ "quantity": "3" }))
        .token(&c.admin)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Ingredient updated successfully");
}

#[tokio::test]
async fn test_review_author_and_admin_can_delete() {
    let c = cast().await;
    let recipe_id = create_recipe(&c.app, &c.owner).await;

    let mut review_ids = Vec::new();
    for _ in 0..2 {
        let (status, _, body) = ApiRequest::post(
            "/api/reviews",
            json!({ "recipeId": recipe_id, "rating": 4, "comment": "Tasty" }),
        )
        .token(&c.other)
        .send(&c.app)
        .await;
        assert_eq!(status, StatusCode::CREATED);
        review_ids.push(body["id"].as_str().unwrap().to_string());
    }

    // The recipe owner doesn't own reviews on it
    let (status, _, _) = ApiRequest::delete(format!("/api/reviews/{}", review_ids[0]))
        .token(&c.owner)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = ApiRequest::delete(format!("/api/reviews/{}", review_ids[0]))
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Review deleted successfully");

    let (status, _, _) = ApiRequest::delete(format!("/api/reviews/{}", review_ids[1]))
        .token(&c.admin)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_favorite_delete_restricted_to_holder() {
    let c = cast().await;
    let recipe_id = create_recipe(&c.app, &c.owner).await;

    let (status, _, body) = ApiRequest::post("/api/favorites", json!({ "recipeId": recipe_id }))
        .token(&c.other)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/favorites/{}", body["id"].as_str().unwrap());

    let (status, _, _) = ApiRequest::delete(&uri).token(&c.owner).send(&c.app).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = ApiRequest::delete(&uri).token(&c.other).send(&c.app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Favorite deleted successfully");
}

#[tokio::test]
async fn test_demoted_admin_loses_override() {
    let c = cast().await;
    let id = create_recipe(&c.app, &c.owner).await;

    let admin_uid = c.state.tokens.verify(&c.admin).unwrap().uid;
    {
        let conn = c.state.db.get().unwrap();
        queries::set_role(&conn, &admin_uid, Role::User).unwrap();
    }

    let (status, _, _) = ApiRequest::delete(format!("/api/recipes/{}", id))
        .token(&c.admin)
        .send(&c.app)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
