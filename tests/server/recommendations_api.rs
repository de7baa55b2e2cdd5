use bookiq::domain::scans::Recommendation;

use crate::helpers::{
    dune_analysis_json, get_authed, mock_gemini_text, post_scan, spawn_app, test_image_base64,
};

#[tokio::test]
async fn recommendations_are_empty_before_any_scan() {
    let app = spawn_app().await;

    let response = get_authed(&app, "/recommendations").await;
    assert_eq!(response.status(), 200);

    let recommendations: Vec<Recommendation> =
        response.json().await.expect("Failed to parse response");
    assert!(recommendations.is_empty());
}

#[tokio::test]
async fn recommendations_come_from_the_most_recent_scan() {
    let app = spawn_app().await;

    mock_gemini_text(&app, &dune_analysis_json()).await;
    assert_eq!(post_scan(&app, &test_image_base64()).await.status(), 201);

    app.mock_server.reset().await;
    mock_gemini_text(
        &app,
        r#"{
            "title": "The Hobbit",
            "author": "J.R.R. Tolkien",
            "future_recommendations": [
                {"title": "The Fellowship of the Ring", "author": "J.R.R. Tolkien", "reason": "The obvious next step."}
            ]
        }"#,
    )
    .await;
    assert_eq!(post_scan(&app, &test_image_base64()).await.status(), 201);

    let recommendations: Vec<Recommendation> = get_authed(&app, "/recommendations")
        .await
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].title, "The Fellowship of the Ring");
}

#[tokio::test]
async fn recommendations_require_auth() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .get(app.api_url("/recommendations"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}
