use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{Span, warn};

use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::profiles::Profile;
use crate::domain::repositories::{ProfileRepository, TokenRepository};
use crate::infrastructure::auth::hash_token;

/// The authenticated caller, resolved from a bearer token. Carries the full
/// profile so handlers can read stored preferences without another lookup.
pub struct AuthenticatedUser {
    pub profile: Profile,
}

impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token_value = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let token = state
            .token_repo
            .get_by_token_hash(&hash_token(token_value))
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let profile = state
            .profile_repo
            .get(token.user_id)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        if let Err(err) = state.token_repo.update_last_used(token.id).await {
            warn!(error = %err, token_id = %token.id, "failed to record token use");
        }

        Span::current().record("user.id", tracing::field::display(&profile.id));

        Ok(Self { profile })
    }
}
