use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::repositories::TokenRepository;
use crate::domain::tokens::{NewToken, TokenCreated};
use crate::infrastructure::auth::{generate_token, hash_token};

#[derive(Debug, Deserialize)]
pub(crate) struct CreateTokenRequest {
    name: String,
}

/// Mint a new API token for the caller. The plaintext value is returned once
/// and only its hash is persisted.
#[tracing::instrument(skip(state, auth_user, payload))]
pub(crate) async fn create_token(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<CreateTokenRequest>,
) -> Result<Response, ApiError> {
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("a token name is required").into());
    }

    let token = generate_token();
    let stored = state
        .token_repo
        .insert(NewToken::new(auth_user.profile.id, hash_token(&token), name))
        .await
        .map_err(AppError::from)?;

    tracing::info!(token_id = %stored.id, name = %stored.name, "api token created");

    let created = TokenCreated {
        id: stored.id,
        name: stored.name,
        token,
        created_at: stored.created_at,
    };
    Ok((StatusCode::CREATED, Json(created)).into_response())
}
