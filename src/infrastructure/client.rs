use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Url};
use serde_json::json;

use crate::application::errors::ErrorResponse;
use crate::domain::ids::ScanId;
use crate::domain::profiles::{ProfileView, UpdateProfile};
use crate::domain::scans::{Recommendation, ScanRecord};
use crate::domain::tokens::TokenCreated;

/// HTTP client for the API, used by the CLI subcommands. Reads the bearer
/// token from `BOOKIQ_TOKEN` when set.
pub struct BookIqClient {
    base_url: Url,
    http: Client,
    token: Option<String>,
}

impl BookIqClient {
    pub fn new(base_url: Url) -> Result<Self> {
        let mut normalized = base_url;
        if !normalized.path().ends_with('/') {
            normalized.set_path(&format!("{}/", normalized.path().trim_end_matches('/')));
        }

        let token = std::env::var("BOOKIQ_TOKEN").ok();

        let http = Client::builder()
            .user_agent("bookiq-cli/0.1")
            .build()
            .context("failed to configure HTTP client")?;

        Ok(Self {
            base_url: normalized,
            http,
            token,
        })
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url).with_context(|| format!("invalid API url: {base_url}"))?;
        Self::new(url)
    }

    /// Submit a base64-encoded cover photo for analysis.
    pub async fn scan(&self, image_base64: &str) -> Result<ScanRecord> {
        let url = self.endpoint("api/v1/scans")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "image": image_base64 }))
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn history(&self, limit: Option<i64>) -> Result<Vec<ScanRecord>> {
        let mut url = self.endpoint("api/v1/scans")?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    pub async fn get_scan(&self, id: ScanId) -> Result<ScanRecord> {
        let url = self.endpoint(&format!("api/v1/scans/{id}"))?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    pub async fn recommendations(&self) -> Result<Vec<Recommendation>> {
        let url = self.endpoint("api/v1/recommendations")?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    pub async fn profile(&self) -> Result<ProfileView> {
        let url = self.endpoint("api/v1/profile")?;
        let response = self.request(reqwest::Method::GET, url).send().await?;
        self.handle_response(response).await
    }

    pub async fn update_profile(&self, changes: &UpdateProfile) -> Result<ProfileView> {
        let url = self.endpoint("api/v1/profile")?;
        let response = self
            .request(reqwest::Method::PUT, url)
            .json(changes)
            .send()
            .await?;
        self.handle_response(response).await
    }

    pub async fn create_token(&self, name: &str) -> Result<TokenCreated> {
        let url = self.endpoint("api/v1/tokens")?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(&json!({ "name": name }))
            .send()
            .await?;
        self.handle_response(response).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("invalid API path: {path}"))
    }

    /// Build a request with authentication if token is available
    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        if response.status().is_success() {
            response
                .json::<T>()
                .await
                .context("failed to deserialize response body")
        } else {
            Err(self.response_error(response).await)
        }
    }

    async fn response_error(&self, response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let bytes = response.bytes().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_slice::<ErrorResponse>(&bytes) {
            return anyhow!("request failed ({status}): {}", err.message);
        }

        let message = String::from_utf8_lossy(&bytes);
        anyhow!("request failed ({status}): {message}")
    }
}
