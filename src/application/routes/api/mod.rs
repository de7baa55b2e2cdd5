pub(crate) mod profiles;
pub(crate) mod scans;
pub(crate) mod tokens;

use axum::routing::{get, post};

use crate::application::state::AppState;

pub(super) fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/scans", post(scans::create_scan).get(scans::list_scans))
        .route("/scans/{id}", get(scans::get_scan))
        .route("/recommendations", get(scans::latest_recommendations))
        .route(
            "/profile",
            get(profiles::get_profile).put(profiles::update_profile),
        )
        .route("/tokens", post(tokens::create_token))
}
