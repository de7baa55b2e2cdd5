use axum::Json;
use axum::extract::State;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::profiles::{ProfileView, UpdateProfile};
use crate::domain::repositories::ProfileRepository;

#[tracing::instrument(skip(auth_user))]
pub(crate) async fn get_profile(auth_user: AuthenticatedUser) -> Json<ProfileView> {
    Json(ProfileView::from(auth_user.profile))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(changes): Json<UpdateProfile>,
) -> Result<Json<ProfileView>, ApiError> {
    if !changes.has_changes() {
        return Err(AppError::validation("no fields provided for update").into());
    }

    let profile = state
        .profile_repo
        .update(auth_user.profile.id, changes)
        .await
        .map_err(AppError::from)?;

    tracing::info!(user_id = %profile.id, "profile updated");
    Ok(Json(ProfileView::from(profile)))
}
