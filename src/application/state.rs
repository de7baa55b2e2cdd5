use std::sync::Arc;

use crate::application::services::ScanService;
use crate::domain::repositories::{ProfileRepository, ScanRepository, TokenRepository};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::profiles::SqlProfileRepository;
use crate::infrastructure::repositories::scans::SqlScanRepository;
use crate::infrastructure::repositories::tokens::SqlTokenRepository;

/// Configuration for external services — everything that varies between
/// production and test environments. Repos and services are created
/// automatically from the database pool.
pub struct AppStateConfig {
    pub gemini_url: String,
    pub gemini_api_key: String,
}

#[derive(Clone)]
pub struct AppState {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub token_repo: Arc<dyn TokenRepository>,
    pub scan_repo: Arc<dyn ScanRepository>,
    pub scan_service: ScanService,
    pub http_client: reqwest::Client,
}

impl AppState {
    /// Build the full application state from a database connection and config.
    pub fn from_database(database: &Database, config: AppStateConfig) -> Self {
        let pool = database.clone_pool();

        let profile_repo: Arc<dyn ProfileRepository> =
            Arc::new(SqlProfileRepository::new(pool.clone()));
        let token_repo: Arc<dyn TokenRepository> = Arc::new(SqlTokenRepository::new(pool.clone()));
        let scan_repo: Arc<dyn ScanRepository> = Arc::new(SqlScanRepository::new(pool));

        #[allow(clippy::expect_used)]
        let http_client = reqwest::ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        let scan_service = ScanService::new(
            Arc::clone(&scan_repo),
            http_client.clone(),
            config.gemini_url,
            config.gemini_api_key,
        );

        Self {
            profile_repo,
            token_repo,
            scan_repo,
            scan_service,
            http_client,
        }
    }
}
