#[path = "../common/mod.rs"]
mod common;
use common::*;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_create_recipe_sets_creator() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (uid, token) = register_and_login(&app, "chef@example.com").await;

    let (status, _, body) = ApiRequest::post("/api/recipes", recipe_body())
        .token(&token)
        .send(&app)
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().unwrap().starts_with("rcp_"));
    assert_eq!(body["title"], "Chole Bhature");
    assert_eq!(body["cookingTime"], 50);
    assert_eq!(body["difficulty"], "Medium");
    assert_eq!(body["createdBy"], uid.as_str());
    assert!(body["createdAt"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_client_supplied_creator_is_ignored() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (uid, token) = register_and_login(&app, "chef@example.com").await;

    let mut body = recipe_body();
    body["createdBy"] = json!("usr_00000000000000000000000000000000");

    let (status, _, body) = ApiRequest::post("/api/recipes", body)
        .token(&token)
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["createdBy"], uid.as_str());
}

#[tokio::test]
async fn test_get_recipe_is_public() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "chef@example.com").await;
    let id = create_recipe(&app, &token).await;

    let (status, _, body) = ApiRequest::get(format!("/api/recipes/{}", id))
        .send(&app)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["cuisineType"], "Punjabi");
}

#[tokio::test]
async fn test_get_missing_recipe_is_404() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);

    let (status, _, body) = ApiRequest::get("/api/recipes/rcp_00000000000000000000000000000000")
        .send(&app)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Recipe not found" }));
}

#[tokio::test]
async fn test_list_recipes_paginates() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "chef@example.com").await;
    for _ in 0..3 {
        create_recipe(&app, &token).await;
    }

    let (status, _, body) = ApiRequest::get("/api/recipes").send(&app).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["limit"], 50);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);

    let (_, _, body) = ApiRequest::get("/api/recipes?limit=2&offset=2").send(&app).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["offset"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (_, _, body) = ApiRequest::get("/api/recipes?limit=1000").send(&app).await;
    assert_eq!(body["limit"], 100);
}

#[tokio::test]
async fn test_update_recipe_partial() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (uid, token) = register_and_login(&app, "chef@example.com").await;
    let id = create_recipe(&app, &token).await;

    let (status, _, body) = ApiRequest::put(
        format!("/api/recipes/{}", id),
        json!({ "title": "Amritsari Chole", "createdBy": "usr_00000000000000000000000000000000" }),
    )
    .token(&token)
    .send(&app)
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Amritsari Chole");
    assert_eq!(body["description"], "Spicy chickpea curry served with fried bread");
    assert_eq!(body["createdBy"], uid.as_str());
    assert!(body["updatedAt"].as_i64() >= body["createdAt"].as_i64());
}

#[tokio::test]
async fn test_empty_update_rejected() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "chef@example.com").await;
    let id = create_recipe(&app, &token).await;

    let (status, _, body) = ApiRequest::put(format!("/api/recipes/{}", id), json!({}))
        .token(&token)
        .send(&app)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one field must be provided");
}

#[tokio::test]
async fn test_update_validates_fields() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "chef@example.com").await;
    let id = create_recipe(&app, &token).await;

    let (status, _, _) = ApiRequest::put(format!("/api/recipes/{}", id), json!({ "cookingTime": 0 }))
        .token(&token)
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_recipe_cascades() {
    let state = test_state(AppEnv::Test);
    let app = test_app(&state);
    let (_, token) = register_and_login(&app, "chef@example.com").await;
    let id = create_recipe(&app, &token).await;

    ApiRequest::post(
        "/api/ingredients",
        json!({ "recipeId": id, "name": "Chickpeas", "quantity": "2" }),
    )
    .token(&token)
    .send(&app)
    .await;
    ApiRequest::post("/api/reviews", json!({ "recipeId": id, "rating": 5 }))
        .token(&token)
        .send(&app)
        .await;
    ApiRequest::post("/api/favorites", json!({ "recipeId": id }))
        .token(&token)
        .send(&app)
        .await;

    let (status, _, _) = ApiRequest::delete(format!("/api/recipes/{}", id))
        .token(&token)
        .send(&app)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = ApiRequest::get(format!("/api/recipes/{}", id)).send(&app).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for uri in [
        format!("/api/ingredients/recipe/{}", id),
        format!("/api/reviews/recipe/{}", id),
        "/api/favorites".to_string(),
    ] {
        let (_, _, body) = ApiRequest::get(&uri).send(&app).await;
        assert_eq!(body["total"], 0, "{} not emptied", uri);
    }
}
