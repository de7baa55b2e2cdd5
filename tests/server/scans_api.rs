use bookiq::domain::scans::ScanRecord;

use crate::helpers::{
    dune_analysis_json, error_message, get_authed, mock_gemini_error, mock_gemini_text, post_scan,
    spawn_app, test_image_base64,
};

#[tokio::test]
async fn scan_happy_path_stores_and_returns_record() {
    let app = spawn_app().await;
    mock_gemini_text(&app, &dune_analysis_json()).await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 201);

    let record: ScanRecord = response.json().await.expect("Failed to parse scan record");
    assert_eq!(record.title, "Dune");
    assert_eq!(record.author, "Frank Herbert");
    assert_eq!(record.genre, "Science Fiction");
    assert_eq!(record.reading_level, "9.0 (9th Grade)");
    assert!(record.is_movie);
    assert_eq!(record.recommendations.len(), 3);
    assert_eq!(record.recommendations[0].title, "Foundation");
}

#[tokio::test]
async fn stored_scan_can_be_fetched_again_identically() {
    let app = spawn_app().await;
    mock_gemini_text(&app, &dune_analysis_json()).await;

    let created: ScanRecord = post_scan(&app, &test_image_base64())
        .await
        .json()
        .await
        .expect("Failed to parse scan record");

    let response = get_authed(&app, &format!("/scans/{}", created.id)).await;
    assert_eq!(response.status(), 200);

    let fetched: ScanRecord = response.json().await.expect("Failed to parse scan record");
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.recommendations, created.recommendations);
    assert_eq!(fetched.ai_analysis, created.ai_analysis);
}

#[tokio::test]
async fn scanning_the_same_cover_twice_creates_two_records() {
    let app = spawn_app().await;
    mock_gemini_text(&app, &dune_analysis_json()).await;

    let first: ScanRecord = post_scan(&app, &test_image_base64())
        .await
        .json()
        .await
        .expect("Failed to parse scan record");
    let second: ScanRecord = post_scan(&app, &test_image_base64())
        .await
        .json()
        .await
        .expect("Failed to parse scan record");

    assert_ne!(first.id, second.id);
    assert_eq!(first.title, second.title);

    let response = get_authed(&app, "/scans").await;
    let history: Vec<ScanRecord> = response.json().await.expect("Failed to parse history");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn history_respects_limit() {
    let app = spawn_app().await;
    mock_gemini_text(&app, &dune_analysis_json()).await;

    for _ in 0..3 {
        assert_eq!(post_scan(&app, &test_image_base64()).await.status(), 201);
    }

    let response = get_authed(&app, "/scans?limit=2").await;
    let history: Vec<ScanRecord> = response.json().await.expect("Failed to parse history");
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn answer_wrapped_in_markdown_fence_is_recovered() {
    let app = spawn_app().await;
    let fenced = format!("```json\n{}\n```", dune_analysis_json());
    mock_gemini_text(&app, &fenced).await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 201);

    let record: ScanRecord = response.json().await.expect("Failed to parse scan record");
    assert_eq!(record.title, "Dune");
}

#[tokio::test]
async fn answer_wrapped_in_prose_is_recovered() {
    let app = spawn_app().await;
    mock_gemini_text(
        &app,
        r#"Here is the analysis you asked for: {"title": "Dune", "author": "Frank Herbert"} Enjoy!"#,
    )
    .await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn loose_movie_flag_is_coerced() {
    let app = spawn_app().await;
    mock_gemini_text(
        &app,
        r#"{"title": "Dune", "author": "Frank Herbert", "is_movie": "yes"}"#,
    )
    .await;

    let record: ScanRecord = post_scan(&app, &test_image_base64())
        .await
        .json()
        .await
        .expect("Failed to parse scan record");
    assert!(record.is_movie);
}

#[tokio::test]
async fn incomplete_recommendation_is_dropped_not_fatal() {
    let app = spawn_app().await;
    mock_gemini_text(
        &app,
        r#"{
            "title": "Dune",
            "author": "Frank Herbert",
            "future_recommendations": [
                {"title": "Foundation", "author": "Isaac Asimov", "reason": "Epic scope."},
                {"title": "", "author": "Nobody"},
                {"author": "Missing Title"}
            ]
        }"#,
    )
    .await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 201);

    let record: ScanRecord = response.json().await.expect("Failed to parse scan record");
    assert_eq!(record.recommendations.len(), 1);
    assert_eq!(record.recommendations[0].title, "Foundation");
}

#[tokio::test]
async fn missing_title_is_unprocessable_and_names_the_field() {
    let app = spawn_app().await;
    mock_gemini_text(&app, r#"{"author": "Frank Herbert"}"#).await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 422);
    assert!(error_message(response).await.contains("title"));
}

#[tokio::test]
async fn provider_error_is_bad_gateway_with_verbatim_message() {
    let app = spawn_app().await;
    mock_gemini_error(&app, 429, "Resource has been exhausted").await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 502);
    assert!(
        error_message(response)
            .await
            .contains("Resource has been exhausted")
    );
}

#[tokio::test]
async fn empty_candidate_list_is_bad_gateway() {
    let app = spawn_app().await;

    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path(crate::helpers::GEMINI_MOCK_PATH))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })),
        )
        .mount(&app.mock_server)
        .await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 502);
    assert!(error_message(response).await.contains("no result"));
}

#[tokio::test]
async fn unrecoverable_answer_is_bad_gateway() {
    let app = spawn_app().await;
    mock_gemini_text(&app, "I could not read the cover, sorry.").await;

    let response = post_scan(&app, &test_image_base64()).await;
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn nothing_is_stored_when_analysis_fails() {
    let app = spawn_app().await;
    mock_gemini_text(&app, r#"{"author": "Frank Herbert"}"#).await;

    assert_eq!(post_scan(&app, &test_image_base64()).await.status(), 422);

    let history: Vec<ScanRecord> = get_authed(&app, "/scans")
        .await
        .json()
        .await
        .expect("Failed to parse history");
    assert!(history.is_empty());
}

#[tokio::test]
async fn invalid_base64_is_rejected_before_the_provider_is_called() {
    let app = spawn_app().await;

    let response = post_scan(&app, "not valid base64!!!").await;
    assert_eq!(response.status(), 400);
    assert!(error_message(response).await.contains("base64"));

    assert!(app.mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_image_is_rejected() {
    let app = spawn_app().await;

    let response = post_scan(&app, "   ").await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn scan_requires_auth() {
    let app = spawn_app().await;

    let response = reqwest::Client::new()
        .post(app.api_url("/scans"))
        .json(&serde_json::json!({ "image": test_image_base64() }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn unknown_scan_id_is_not_found() {
    let app = spawn_app().await;

    let response = get_authed(&app, "/scans/9999").await;
    assert_eq!(response.status(), 404);
}
