use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Deserialize;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::ids::ScanId;
use crate::domain::repositories::ScanRepository;
use crate::domain::scans::Recommendation;

/// One captured cover image, base64-encoded JPEG as produced by acquisition.
#[derive(Debug, Deserialize)]
pub(crate) struct ScanSubmission {
    image: String,
}

/// Run the cover analysis pipeline for the authenticated caller and persist
/// the result. One attempt per call; on failure the caller re-invokes from
/// scratch.
#[tracing::instrument(skip(state, auth_user, payload))]
pub(crate) async fn create_scan(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<ScanSubmission>,
) -> Result<Response, ApiError> {
    let image = payload.image.trim();
    if image.is_empty() {
        return Err(AppError::validation("an image is required").into());
    }
    BASE64_STANDARD
        .decode(image)
        .map_err(|_| AppError::validation("image is not valid base64"))?;

    let record = state
        .scan_service
        .analyze_and_store(&auth_user.profile, image)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryQuery {
    limit: Option<i64>,
}

/// Scan history for the caller, newest first.
#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_scans(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Response, ApiError> {
    let limit = query.limit.filter(|n| *n > 0);
    let scans = state
        .scan_repo
        .list_for_user(auth_user.profile.id, limit)
        .await
        .map_err(AppError::from)?;

    Ok(Json(scans).into_response())
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn get_scan(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<ScanId>,
) -> Result<Response, ApiError> {
    let scan = state.scan_repo.get(id).await.map_err(AppError::from)?;

    // Scans are scoped to their owner; anyone else sees a 404.
    if scan.user_id != auth_user.profile.id {
        return Err(AppError::NotFound.into());
    }

    Ok(Json(scan).into_response())
}

/// The home-surface "personalized for you" view: the recommendation list of
/// the most recent scan. Empty when the caller has never scanned.
#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn latest_recommendations(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Recommendation>>, ApiError> {
    let recommendations = state
        .scan_service
        .latest_recommendations(auth_user.profile.id)
        .await
        .map_err(AppError::from)?;

    Ok(Json(recommendations))
}
