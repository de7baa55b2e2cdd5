use bookiq::domain::tokens::TokenCreated;

use crate::helpers::{get_authed, spawn_app};

#[tokio::test]
async fn created_token_is_returned_once_and_works() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.api_url("/tokens"))
        .bearer_auth(&app.auth_token)
        .json(&serde_json::json!({ "name": "phone" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 201);

    let created: TokenCreated = response.json().await.expect("Failed to parse token");
    assert_eq!(created.name, "phone");
    assert!(!created.token.is_empty());

    // The new token authenticates on its own
    let response = reqwest::Client::new()
        .get(app.api_url("/profile"))
        .bearer_auth(&created.token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn token_name_is_required() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.api_url("/tokens"))
        .bearer_auth(&app.auth_token)
        .json(&serde_json::json!({ "name": "  " }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(app.api_url("/profile"))
        .bearer_auth("not-a-real-token")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);

    // Sanity check: the helper's real token still works
    assert_eq!(get_authed(&app, "/profile").await.status(), 200);
}
