use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use bookiq::application::routes::app_router;
use bookiq::application::state::{AppState, AppStateConfig};
use bookiq::domain::profiles::NewProfile;
use bookiq::domain::repositories::{ProfileRepository, ScanRepository, TokenRepository};
use bookiq::domain::tokens::NewToken;
use bookiq::infrastructure::auth::{generate_token, hash_token};
use tokio::net::TcpListener;
use tokio::task::AbortHandle;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GEMINI_MOCK_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

pub struct TestApp {
    pub address: String,
    pub profile_repo: Arc<dyn ProfileRepository>,
    #[allow(dead_code)]
    pub token_repo: Arc<dyn TokenRepository>,
    #[allow(dead_code)]
    pub scan_repo: Arc<dyn ScanRepository>,
    pub auth_token: String,
    pub mock_server: MockServer,
    server_handle: AbortHandle,
}

impl TestApp {
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.address, path)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.server_handle.abort();
    }
}

pub async fn spawn_app() -> TestApp {
    let mock_server = MockServer::start().await;
    let gemini_url = format!("{}{}", mock_server.uri(), GEMINI_MOCK_PATH);

    let database = bookiq::infrastructure::database::Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            gemini_url,
            gemini_api_key: "test-key".to_string(),
        },
    );

    let profile_repo = state.profile_repo.clone();
    let token_repo = state.token_repo.clone();
    let scan_repo = state.scan_repo.clone();

    let profile = profile_repo
        .insert(NewProfile {
            first_name: "Test".to_string(),
            last_name: "Reader".to_string(),
            favorite_genre: Some("Sci-Fi".to_string()),
            school_grade: Some("7".to_string()),
        })
        .await
        .expect("Failed to create test profile");

    let auth_token = generate_token();
    token_repo
        .insert(NewToken::new(
            profile.id,
            hash_token(&auth_token),
            "test-token".to_string(),
        ))
        .await
        .expect("Failed to insert test token");

    let app = app_router(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");

    let local_addr = listener.local_addr().expect("Failed to get local address");
    let address = format!("http://{local_addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Server failed to start");
    })
    .abort_handle();

    TestApp {
        address,
        profile_repo,
        token_repo,
        scan_repo,
        auth_token,
        mock_server,
        server_handle,
    }
}

/// A tiny valid base64 payload standing in for a cover photo.
pub fn test_image_base64() -> String {
    BASE64_STANDARD.encode(b"not really a jpeg, but valid base64")
}

/// Mount a Gemini mock whose first candidate carries the given answer text.
pub async fn mock_gemini_text(app: &TestApp, text: &str) {
    let body = serde_json::json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": text }],
                "role": "model"
            },
            "finishReason": "STOP"
        }]
    });

    Mock::given(method("POST"))
        .and(path(GEMINI_MOCK_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&app.mock_server)
        .await;
}

/// Mount a Gemini mock returning an error payload, as sent for rate limits
/// and invalid API keys.
pub async fn mock_gemini_error(app: &TestApp, status: u16, message: &str) {
    let body = serde_json::json!({
        "error": {
            "code": status,
            "message": message,
            "status": "FAILED_PRECONDITION"
        }
    });

    Mock::given(method("POST"))
        .and(path(GEMINI_MOCK_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&app.mock_server)
        .await;
}

/// A complete, well-formed analysis answer for the happy path.
pub fn dune_analysis_json() -> String {
    serde_json::json!({
        "title": "Dune",
        "author": "Frank Herbert",
        "genre": "Science Fiction",
        "reading_level": "9.0 (9th Grade)",
        "maturity_level": "PG-13 - war themes and political violence",
        "is_movie": true,
        "future_recommendations": [
            {
                "title": "Foundation",
                "author": "Isaac Asimov",
                "reason": "Another epic about the fate of civilizations."
            },
            {
                "title": "Hyperion",
                "author": "Dan Simmons",
                "reason": "Layered world-building with a literary bent."
            },
            {
                "title": "Ender's Game",
                "author": "Orson Scott Card",
                "reason": "A younger protagonist facing impossible stakes."
            }
        ],
        "analysis_summary": "Appropriate for grade 7 readers comfortable with complex plots. A strong match for a Sci-Fi fan."
    })
    .to_string()
}

/// POST a scan request with the app's auth token.
pub async fn post_scan(app: &TestApp, image: &str) -> reqwest::Response {
    reqwest::Client::new()
        .post(app.api_url("/scans"))
        .bearer_auth(&app.auth_token)
        .json(&serde_json::json!({ "image": image }))
        .send()
        .await
        .expect("Failed to execute scan request")
}

/// GET an API path with the app's auth token.
pub async fn get_authed(app: &TestApp, path: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(app.api_url(path))
        .bearer_auth(&app.auth_token)
        .send()
        .await
        .expect("Failed to execute request")
}

pub async fn error_message(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.expect("Failed to parse error body");
    body["message"]
        .as_str()
        .expect("error body has no message")
        .to_string()
}
