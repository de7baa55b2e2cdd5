use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::application::routes::app_router;
use crate::application::state::{AppState, AppStateConfig};
use crate::domain::profiles::NewProfile;
use crate::domain::repositories::{ProfileRepository, TokenRepository};
use crate::domain::tokens::NewToken;
use crate::infrastructure::auth::{generate_token, hash_token};
use crate::infrastructure::database::Database;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub gemini_api_key: String,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let database = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let state = AppState::from_database(
        &database,
        AppStateConfig {
            gemini_url: crate::infrastructure::ai::GEMINI_URL.to_string(),
            gemini_api_key: config.gemini_api_key,
        },
    );

    // Bootstrap: if no profiles exist, create one and print its API token
    bootstrap_profile(&state.profile_repo, &state.token_repo).await?;

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(
        address = %config.bind_address,
        database = %config.database_url,
        "starting HTTP server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

async fn bootstrap_profile(
    profile_repo: &Arc<dyn ProfileRepository>,
    token_repo: &Arc<dyn TokenRepository>,
) -> anyhow::Result<()> {
    let profiles_exist = profile_repo
        .exists()
        .await
        .context("failed to check if profiles exist")?;

    if profiles_exist {
        return Ok(());
    }

    let profile = profile_repo
        .insert(NewProfile {
            first_name: "Reader".to_string(),
            last_name: String::new(),
            favorite_genre: None,
            school_grade: None,
        })
        .await
        .context("failed to create initial profile")?;

    let token = generate_token();
    token_repo
        .insert(NewToken::new(
            profile.id,
            hash_token(&token),
            "bootstrap".to_string(),
        ))
        .await
        .context("failed to create initial API token")?;

    info!("No profiles found. Created one with API token:");
    info!("  {token}");
    info!("Store it now; only its hash is kept.");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
